//! Filesystem plumbing shared by the format adapters.
//!
//! Handles are scoped: they close when the returned box drops, on success
//! and error paths alike. I/O errors are classified into
//! [`DataIoError`](crate::DataIoError) variants with the offending path.

pub mod compression;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "io-json")))]
#[cfg(feature = "io-json")]
pub mod json;

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

use crate::error::{DataIoError, Result};
use compression::{FinishWrite, auto_detect_reader, auto_detect_writer};
use std::fs::{File, create_dir_all};
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Open `path` for reading, decompressing transparently.
///
/// # Errors
/// [`DataIoError::FileNotFound`] if the path does not exist (or is a
/// directory), otherwise the classified I/O error.
pub fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    if path.is_dir() {
        return Err(DataIoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let f = File::open(path).map_err(|e| DataIoError::from_io(e, path))?;
    auto_detect_reader(f, path)
}

/// Create or truncate `path` for writing, compressing transparently.
///
/// With `create_dirs`, missing parent directories are created first. Call
/// [`FinishWrite::finish`] on the result once everything is written;
/// dropping it instead loses any error from the final flush or trailer.
///
/// # Errors
/// [`DataIoError::PermissionDenied`] or [`DataIoError::Io`].
pub fn create_writer(path: &Path, create_dirs: bool) -> Result<Box<dyn FinishWrite>> {
    if create_dirs
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        log::debug!("creating directory {}", parent.display());
        create_dir_all(parent).map_err(|e| DataIoError::from_write_io(e, parent))?;
    }
    let f = File::create(path).map_err(|e| DataIoError::from_write_io(e, path))?;
    auto_detect_writer(f, path)
}

/// Classify an I/O error raised while decoding the content of `path`.
///
/// `InvalidData` and `InvalidInput` come from bytes that do not match the
/// declared encoding (bad UTF-8, a corrupt codec header) and are reported as
/// [`DataIoError::Parse`]; everything else goes through
/// [`DataIoError::from_io`].
pub(crate) fn read_io_error(err: std::io::Error, format: &str, path: &Path) -> DataIoError {
    match err.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            DataIoError::parse(format, path, err.to_string())
        }
        _ => DataIoError::from_io(err, path),
    }
}

/// Map a `serde_json` failure on a read of `path` to the crate taxonomy.
pub(crate) fn json_read_error(err: serde_json::Error, format: &str, path: &Path) -> DataIoError {
    if err.is_io() {
        read_io_error(err.into(), format, path)
    } else {
        DataIoError::parse(format, path, err.to_string())
    }
}

/// Map a `serde_json` failure on a write of `path` to the crate taxonomy.
pub(crate) fn json_write_error(err: serde_json::Error, path: &Path) -> DataIoError {
    DataIoError::from_write_io(err.into(), path)
}

/// Report a table that could not be built from file content as a parse error.
pub(crate) fn content_error(err: DataIoError, format: &str, path: &Path) -> DataIoError {
    match err {
        DataIoError::InvalidTable(message) => DataIoError::parse(format, path, message),
        other => other,
    }
}
