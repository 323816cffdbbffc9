//! I/O configuration: where the data lives and which format it is in.

use crate::error::{DataIoError, Result};
use crate::registry::{self, normalize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Immutable pair of base path and format type.
///
/// Fields are validated on construction and cannot change afterwards;
/// [`IoConfig::with_format_type`] returns a new value. The format type is
/// stored normalized (trimmed, lowercase) and is resolved against a registry
/// only when I/O happens.
///
/// Deserializes from `{"base_path": "...", "format_type": "..."}` with the
/// same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIoConfig")]
pub struct IoConfig {
    base_path: PathBuf,
    format_type: String,
}

#[derive(Deserialize)]
struct RawIoConfig {
    base_path: PathBuf,
    format_type: String,
}

impl TryFrom<RawIoConfig> for IoConfig {
    type Error = DataIoError;

    fn try_from(raw: RawIoConfig) -> Result<Self> {
        Self::new(raw.base_path, raw.format_type)
    }
}

impl IoConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    /// [`DataIoError::InvalidConfig`] if either field is empty.
    pub fn new(base_path: impl Into<PathBuf>, format_type: impl AsRef<str>) -> Result<Self> {
        let base_path = base_path.into();
        if base_path.as_os_str().is_empty() {
            return Err(DataIoError::InvalidConfig("base_path must not be empty".into()));
        }
        let format_type = normalize(format_type.as_ref());
        if format_type.is_empty() {
            return Err(DataIoError::InvalidConfig("format_type must not be empty".into()));
        }
        Ok(Self {
            base_path,
            format_type,
        })
    }

    /// Build a configuration for a single file, taking the format from its
    /// extension via the process-wide registry.
    ///
    /// # Errors
    /// [`DataIoError::UnsupportedFormat`] if no adapter claims the extension.
    pub fn for_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let adapter = registry::resolve_path(&path)?;
        Self::new(path, adapter.id())
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    /// [`DataIoError::FileNotFound`] if the file is missing,
    /// [`DataIoError::Parse`] if it is not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DataIoError::from_io(e, path))?;
        serde_json::from_str(&text).map_err(|e| DataIoError::parse("config", path, e.to_string()))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn format_type(&self) -> &str {
        &self.format_type
    }

    /// A copy of this configuration with a different format type.
    ///
    /// # Errors
    /// See [`IoConfig::new`].
    pub fn with_format_type(&self, format_type: impl AsRef<str>) -> Result<Self> {
        Self::new(self.base_path.clone(), format_type)
    }

    /// The file an operation touches: the base path, or `sub_path` under it.
    ///
    /// # Errors
    /// [`DataIoError::InvalidConfig`] if `sub_path` is absolute or climbs
    /// out of the base path with `..`.
    pub fn resolve_path(&self, sub_path: Option<&Path>) -> Result<PathBuf> {
        let Some(sub) = sub_path else {
            return Ok(self.base_path.clone());
        };
        let escapes = sub
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if escapes {
            return Err(DataIoError::InvalidConfig(format!(
                "sub-path '{}' must be relative to the base path",
                sub.display()
            )));
        }
        Ok(self.base_path.join(sub))
    }
}
