//! JSON Lines adapter: one compact record object per line.
//!
//! Empty or whitespace-only lines are skipped on read. Parse errors name the
//! offending line number.

use crate::adapter::{FormatAdapter, ReadOptions, WriteOptions};
use crate::error::{DataIoError, Result};
use crate::io::compression::FinishWrite;
use crate::io::{content_error, create_writer, json_write_error, open_reader, read_io_error};
use crate::table::Table;
use serde_json::{Map, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

const ID: &str = "jsonl";

/// Newline-delimited JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlFormat;

impl FormatAdapter for JsonlFormat {
    fn id(&self) -> &str {
        ID
    }

    fn extensions(&self) -> &[&str] {
        &[".jsonl", ".ndjson"]
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<Table> {
        log::debug!("reading JSONL from {}", path.display());
        let rdr = BufReader::new(open_reader(path)?);
        let mut records = Vec::<Map<String, Value>>::new();
        for (i, line) in rdr.lines().enumerate() {
            let line = line.map_err(|e| match read_io_error(e, ID, path) {
                DataIoError::Parse { message, .. } => {
                    DataIoError::parse(ID, path, format!("line {}: {message}", i + 1))
                }
                other => other,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(map)) => records.push(map),
                Ok(other) => {
                    return Err(DataIoError::parse(
                        ID,
                        path,
                        format!("line {}: expected an object, found {other}", i + 1),
                    ));
                }
                Err(e) => {
                    return Err(DataIoError::parse(ID, path, format!("line {}: {e}", i + 1)));
                }
            }
        }
        Table::from_records(records).map_err(|e| content_error(e, ID, path))
    }

    fn write(&self, path: &Path, table: &Table, options: &WriteOptions) -> Result<usize> {
        log::debug!("writing JSONL to {}", path.display());
        let mut w = create_writer(path, options.create_dirs)?;
        for rec in table.to_records() {
            serde_json::to_writer(&mut w, &rec).map_err(|e| json_write_error(e, path))?;
            w.write_all(b"\n")
                .map_err(|e| DataIoError::from_write_io(e, path))?;
        }
        w.finish().map_err(|e| DataIoError::from_write_io(e, path))?;
        Ok(table.num_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn blank_lines_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("in.jsonl");
        fs::write(&path, "{\"id\":1}\n\n   \n{\"id\":2}\n").unwrap();

        let t = JsonlFormat.read(&path, &ReadOptions::default()).unwrap();
        assert_eq!(t.num_rows(), 2);
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.jsonl");
        fs::write(&path, "{\"id\":1}\n[1,2]\n").unwrap();

        let err = JsonlFormat.read(&path, &ReadOptions::default()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.jsonl");
        fs::write(&path, b"{\"a\":1}\n{\"a\":\"\xff\xfe\"}\n").unwrap();

        let err = JsonlFormat.read(&path, &ReadOptions::default()).unwrap_err();
        assert!(err.is_parse(), "{err}");
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn writes_one_record_per_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.jsonl");
        let t = Table::with_rows(["id", "w"], vec![vec![1.into(), "hi".into()], vec![2.into(), "there".into()]]).unwrap();

        assert_eq!(JsonlFormat.write(&path, &t, &WriteOptions::default()).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"id\":1,\"w\":\"hi\"}\n{\"id\":2,\"w\":\"there\"}\n"
        );
    }
}
