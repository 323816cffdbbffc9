//! Error types for format resolution and file I/O.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DataIoError>;

/// Errors surfaced by the registry, the adapters and the configuration layer.
///
/// Every error is returned to the caller as-is; nothing is retried and a
/// failed write is not rolled back.
#[derive(Error, Debug)]
pub enum DataIoError {
    /// No adapter is registered under the requested format identifier.
    #[error("no adapter registered for format: '{format}'")]
    UnsupportedFormat {
        /// The identifier (or file extension) that failed to resolve
        format: String,
    },

    /// The file to read does not exist.
    #[error("the file '{}' does not exist", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// File content does not match the declared format.
    #[error("failed to parse {format} from '{}': {message}", path.display())]
    Parse {
        /// Identifier of the adapter that rejected the content
        format: String,
        /// Path of the offending file
        path: PathBuf,
        /// What went wrong, including row/line numbers where known
        message: String,
    },

    /// The filesystem refused access to the path.
    #[error("permission denied for '{}'", path.display())]
    PermissionDenied {
        /// Path that could not be accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Any other filesystem failure.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A table violated its shape invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

impl DataIoError {
    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a parse error for `format` at `path`.
    pub fn parse(format: impl Into<String>, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Classify an I/O error raised while touching `path`.
    ///
    /// `NotFound` becomes [`DataIoError::FileNotFound`] and `PermissionDenied`
    /// becomes [`DataIoError::PermissionDenied`]; everything else is
    /// [`DataIoError::Io`].
    pub fn from_io(source: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Classify an I/O error raised while writing `path`.
    ///
    /// A missing file during a write means a missing directory, which is a
    /// filesystem failure rather than [`DataIoError::FileNotFound`].
    pub fn from_write_io(source: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Whether this is an [`DataIoError::UnsupportedFormat`].
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Whether this is a [`DataIoError::FileNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Whether this is a [`DataIoError::Parse`].
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
