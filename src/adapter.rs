//! The read/write contract every format adapter implements.

use crate::error::{DataIoError, Result};
use crate::table::Table;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Reads and writes a [`Table`] in one file format.
///
/// Adapters are stateless and shared behind `Arc`, so they must be
/// `Send + Sync`. Adding a format means implementing this trait and
/// registering the adapter; nothing else changes.
///
/// ```
/// use data_handling::{FormatAdapter, ReadOptions, Result, Table, WriteOptions};
/// use std::path::Path;
///
/// struct Nothing;
///
/// impl FormatAdapter for Nothing {
///     fn id(&self) -> &str { "nothing" }
///     fn extensions(&self) -> &[&str] { &[".nothing"] }
///     fn read(&self, _path: &Path, _options: &ReadOptions) -> Result<Table> {
///         Ok(Table::default())
///     }
///     fn write(&self, _path: &Path, table: &Table, _options: &WriteOptions) -> Result<usize> {
///         Ok(table.num_rows())
///     }
/// }
/// ```
pub trait FormatAdapter: Send + Sync {
    /// Registry key, lowercase (e.g. "csv").
    fn id(&self) -> &str;

    /// Lowercase file extensions with the leading dot (e.g. `&[".csv"]`).
    fn extensions(&self) -> &[&str];

    /// Load the table stored at `path`.
    ///
    /// # Errors
    /// [`DataIoError::FileNotFound`] if `path` does not exist,
    /// [`DataIoError::Parse`] if the content is not valid for this format.
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table>;

    /// Persist `table` to `path`, replacing whatever was there.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// [`DataIoError::PermissionDenied`] or [`DataIoError::Io`] on
    /// filesystem failure.
    fn write(&self, path: &Path, table: &Table, options: &WriteOptions) -> Result<usize>;
}

/// Options for read operations. Adapters ignore fields that do not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field delimiter (CSV).
    pub delimiter: u8,
    /// Whether the first row holds column names (CSV).
    pub has_headers: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

/// Options for write operations. Adapters ignore fields that do not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Field delimiter (CSV).
    pub delimiter: u8,
    /// Whether to emit a header row (CSV).
    pub has_headers: bool,
    /// Create missing parent directories before writing.
    pub create_dirs: bool,
    /// Indent the output (JSON).
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            create_dirs: true,
            pretty: false,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// The formats that ship with the crate.
///
/// Anything else can still be registered by id; this enum only names the
/// built-in set so callers do not have to spell strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    Csv,
    Json,
    Jsonl,
}

impl FormatType {
    pub const ALL: [FormatType; 3] = [Self::Csv, Self::Json, Self::Jsonl];

    /// Registry id of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

impl AsRef<str> for FormatType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatType {
    type Err = DataIoError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DataIoError::unsupported_format(wanted))
    }
}
