//! Configuration-driven entry points.
//!
//! [`DataStore`] ties an [`IoConfig`] to a registry: every call resolves the
//! configured format, derives the target path and hands both to the
//! adapter. [`load_data`] and [`save_data`] do the same for a one-off path
//! and format type.

use crate::adapter::{FormatAdapter, ReadOptions, WriteOptions};
use crate::config::IoConfig;
use crate::error::Result;
use crate::registry::{self, FormatRegistry};
use crate::table::Table;
use std::path::Path;
use std::sync::Arc;

/// Reads and writes tables at the location named by an [`IoConfig`].
///
/// ```no_run
/// use data_handling::{DataStore, IoConfig, Table};
///
/// # fn main() -> data_handling::Result<()> {
/// let store = DataStore::new(IoConfig::new("output", "csv")?);
/// let table = Table::with_rows(["id", "name"], vec![vec![1.into(), "Neo".into()]])?;
/// store.save_to("people.csv", &table)?;
/// let back = store.load_from("people.csv")?;
/// assert_eq!(back, table);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DataStore {
    config: IoConfig,
    registry: Option<Arc<FormatRegistry>>,
}

impl DataStore {
    /// Resolve formats against the process-wide registry.
    pub fn new(config: IoConfig) -> Self {
        Self {
            config,
            registry: None,
        }
    }

    /// Resolve formats against `registry` instead of the process-wide one.
    pub fn with_registry(config: IoConfig, registry: Arc<FormatRegistry>) -> Self {
        Self {
            config,
            registry: Some(registry),
        }
    }

    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    /// The adapter for the configured format.
    ///
    /// # Errors
    /// [`DataIoError::UnsupportedFormat`](crate::DataIoError::UnsupportedFormat).
    pub fn adapter(&self) -> Result<Arc<dyn FormatAdapter>> {
        let format_type = self.config.format_type();
        match &self.registry {
            Some(r) => r.resolve(format_type),
            None => registry::resolve(format_type),
        }
    }

    /// Read the table stored at the base path.
    pub fn load(&self) -> Result<Table> {
        self.load_with(None, &ReadOptions::default())
    }

    /// Read the table stored at `sub_path` under the base path.
    pub fn load_from(&self, sub_path: impl AsRef<Path>) -> Result<Table> {
        self.load_with(Some(sub_path.as_ref()), &ReadOptions::default())
    }

    /// Read with explicit options; `None` reads the base path itself.
    ///
    /// # Errors
    /// Unsupported format, invalid sub-path, or any adapter read error.
    pub fn load_with(&self, sub_path: Option<&Path>, options: &ReadOptions) -> Result<Table> {
        let adapter = self.adapter()?;
        let path = self.config.resolve_path(sub_path)?;
        let table = adapter.read(&path, options)?;
        log::info!(
            "read {} rows x {} columns from {} ({})",
            table.num_rows(),
            table.num_columns(),
            path.display(),
            adapter.id()
        );
        Ok(table)
    }

    /// Write `table` to the base path, replacing its content.
    pub fn save(&self, table: &Table) -> Result<usize> {
        self.save_with(None, table, &WriteOptions::default())
    }

    /// Write `table` to `sub_path` under the base path, replacing its content.
    pub fn save_to(&self, sub_path: impl AsRef<Path>, table: &Table) -> Result<usize> {
        self.save_with(Some(sub_path.as_ref()), table, &WriteOptions::default())
    }

    /// Write with explicit options; `None` writes the base path itself.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Unsupported format, invalid sub-path, or any adapter write error.
    pub fn save_with(
        &self,
        sub_path: Option<&Path>,
        table: &Table,
        options: &WriteOptions,
    ) -> Result<usize> {
        let adapter = self.adapter()?;
        let path = self.config.resolve_path(sub_path)?;
        let n = adapter.write(&path, table, options)?;
        log::info!("wrote {n} rows to {} ({})", path.display(), adapter.id());
        Ok(n)
    }
}

/// Read the table at `source` with the adapter registered for `format_type`.
///
/// # Errors
/// [`DataIoError::UnsupportedFormat`](crate::DataIoError::UnsupportedFormat)
/// before touching the filesystem, then any adapter read error.
pub fn load_data(source: impl AsRef<Path>, format_type: &str) -> Result<Table> {
    DataStore::new(IoConfig::new(source.as_ref(), format_type)?).load()
}

/// Write `table` to `target` with the adapter registered for `format_type`.
///
/// # Errors
/// [`DataIoError::UnsupportedFormat`](crate::DataIoError::UnsupportedFormat)
/// before touching the filesystem, then any adapter write error.
pub fn save_data(table: &Table, target: impl AsRef<Path>, format_type: &str) -> Result<usize> {
    DataStore::new(IoConfig::new(target.as_ref(), format_type)?).save(table)
}
