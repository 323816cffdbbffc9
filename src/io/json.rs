//! JSON adapter: a document holding an array of record objects.
//!
//! Writes always produce `[{...}, {...}]` with keys in column order. Reads
//! also accept a single top-level object as a one-row table. Nested arrays
//! or objects inside a record are rejected.

use crate::adapter::{FormatAdapter, ReadOptions, WriteOptions};
use crate::error::{DataIoError, Result};
use crate::io::compression::FinishWrite;
use crate::io::{content_error, create_writer, json_read_error, json_write_error, open_reader};
use crate::table::Table;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

const ID: &str = "json";

/// Record-oriented JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FormatAdapter for JsonFormat {
    fn id(&self) -> &str {
        ID
    }

    fn extensions(&self) -> &[&str] {
        &[".json"]
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<Table> {
        log::debug!("reading JSON from {}", path.display());
        let rdr = open_reader(path)?;
        let value: Value =
            serde_json::from_reader(rdr).map_err(|e| json_read_error(e, ID, path))?;
        Table::from_json(value).map_err(|e| content_error(e, ID, path))
    }

    fn write(&self, path: &Path, table: &Table, options: &WriteOptions) -> Result<usize> {
        log::debug!("writing JSON to {}", path.display());
        let mut w = create_writer(path, options.create_dirs)?;
        let doc = table.to_json();
        let written = if options.pretty {
            serde_json::to_writer_pretty(&mut w, &doc)
        } else {
            serde_json::to_writer(&mut w, &doc)
        };
        written.map_err(|e| json_write_error(e, path))?;
        w.write_all(b"\n")
            .and_then(|()| w.finish())
            .map_err(|e| DataIoError::from_write_io(e, path))?;
        Ok(table.num_rows())
    }
}
