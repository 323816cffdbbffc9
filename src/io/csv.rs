//! CSV adapter.
//!
//! Cells go through the canonical text mapping in [`crate::table`]: on read
//! every field is passed to [`Cell::infer`], on write every cell is rendered
//! with [`Cell::to_field`].
//!
//! * With headers, the first row names the columns. Without, columns are
//!   named by position: `"0"`, `"1"`, ...
//! * Rows whose width differs from the first row are a parse error.
//! * An empty file reads as an empty table, and an empty table writes an
//!   empty file.

use crate::adapter::{FormatAdapter, ReadOptions, WriteOptions};
use crate::error::{DataIoError, Result};
use crate::io::compression::FinishWrite;
use crate::io::{content_error, create_writer, open_reader, read_io_error};
use crate::table::{Cell, Table};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

const ID: &str = "csv";

/// Comma-separated values, optionally with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl FormatAdapter for CsvFormat {
    fn id(&self) -> &str {
        ID
    }

    fn extensions(&self) -> &[&str] {
        &[".csv"]
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        log::debug!("reading CSV from {}", path.display());
        let rdr = open_reader(path)?;
        read_csv_table(rdr, path, options)
    }

    fn write(&self, path: &Path, table: &Table, options: &WriteOptions) -> Result<usize> {
        log::debug!("writing CSV to {}", path.display());
        let mut w = create_writer(path, options.create_dirs)?;
        let n = write_csv_table(&mut w, path, table, options)?;
        w.finish().map_err(|e| DataIoError::from_write_io(e, path))?;
        Ok(n)
    }
}

/// Parse CSV from `reader`; `path` is only used in error messages.
///
/// # Errors
/// [`DataIoError::Parse`] on malformed content or duplicate header names.
pub fn read_csv_table<R: Read>(reader: R, path: &Path, options: &ReadOptions) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .from_reader(reader);

    let mut table = if options.has_headers {
        let headers = rdr.headers().map_err(|e| read_error(e, path))?;
        Some(Table::new(headers.iter()).map_err(|e| content_error(e, ID, path))?)
    } else {
        None
    };

    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| read_error(e, path))?;
        let table = table.get_or_insert_with(|| positional_columns(rec.len()));
        let row: Vec<Cell> = rec.iter().map(Cell::infer).collect();
        table.push_row(row).map_err(|e| {
            DataIoError::parse(ID, path, format!("record #{}: {e}", i + 1))
        })?;
    }

    Ok(table.unwrap_or_default())
}

/// Serialize `table` as CSV into `writer`; `path` is only used in error messages.
///
/// Returns the number of data rows written.
///
/// # Errors
/// The classified I/O error if the underlying writer fails.
pub fn write_csv_table<W: Write>(
    writer: W,
    path: &Path,
    table: &Table,
    options: &WriteOptions,
) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .from_writer(writer);

    // A zero-width record would be written as `""`, which reads back as one column.
    if table.num_columns() > 0 {
        if options.has_headers {
            wtr.write_record(table.columns())
                .map_err(|e| write_error(e, path))?;
        }
        for row in table.rows() {
            wtr.write_record(row.iter().map(Cell::to_field))
                .map_err(|e| write_error(e, path))?;
        }
    }
    wtr.flush()
        .map_err(|e| DataIoError::from_write_io(e, path))?;
    Ok(table.num_rows())
}

fn positional_columns(width: usize) -> Table {
    Table::new((0..width).map(|i| i.to_string())).unwrap_or_default()
}

fn read_error(err: csv::Error, path: &Path) -> DataIoError {
    if !err.is_io_error() {
        return DataIoError::parse(ID, path, err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(e) => read_io_error(e, ID, path),
        other => DataIoError::parse(ID, path, format!("{other:?}")),
    }
}

fn write_error(err: csv::Error, path: &Path) -> DataIoError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DataIoError::from_write_io(e, path),
        other => DataIoError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other(format!("{other:?}")),
        },
    }
}
