//! Fixtures and assertions for tests that exercise adapters.
//!
//! ```
//! use data_handling::testing::*;
//! use data_handling::{load_data, save_data};
//!
//! # fn main() -> data_handling::Result<()> {
//! let (_dir, config) = temp_config("csv", "scores.csv")?;
//! let table = sample_table();
//! save_data(&table, config.base_path(), config.format_type())?;
//! let back = load_data(config.base_path(), config.format_type())?;
//! assert_tables_equal(&back, &table);
//! # Ok(())
//! # }
//! ```

use crate::config::IoConfig;
use crate::error::{DataIoError, Result};
use crate::table::{Cell, Table};
use tempfile::TempDir;

/// Three rows of `id`, `name`, `score` with an integer, a string and a float
/// column.
#[must_use]
pub fn sample_table() -> Table {
    let rows = vec![
        vec![Cell::Int(1), Cell::from("Alice"), Cell::Float(85.5)],
        vec![Cell::Int(2), Cell::from("Bob"), Cell::Float(90.0)],
        vec![Cell::Int(3), Cell::from("Charlie"), Cell::Float(92.5)],
    ];
    Table::with_rows(["id", "name", "score"], rows).expect("fixture is well-formed")
}

/// A table touching every cell variant, including a null.
#[must_use]
pub fn mixed_table() -> Table {
    let rows = vec![
        vec![Cell::Int(-7), Cell::Bool(true), Cell::Null, Cell::from("x y")],
        vec![Cell::Int(i64::MAX), Cell::Bool(false), Cell::Float(0.25), Cell::from("quote \" and, comma")],
    ];
    Table::with_rows(["n", "flag", "ratio", "text"], rows).expect("fixture is well-formed")
}

/// A fresh temporary directory and a config pointing at `file_name` inside it.
///
/// Keep the returned [`TempDir`] alive for as long as the files are needed.
///
/// # Errors
/// [`DataIoError::Io`] if the directory cannot be created, or the config
/// validation error.
pub fn temp_config(format_type: &str, file_name: &str) -> Result<(TempDir, IoConfig)> {
    let dir = tempfile::tempdir().map_err(|e| DataIoError::from_write_io(e, std::env::temp_dir()))?;
    let config = IoConfig::new(dir.path().join(file_name), format_type)?;
    Ok((dir, config))
}

/// Assert two tables are equal, reporting the first differing column or cell.
///
/// # Panics
///
/// Panics if the columns or any row differ.
pub fn assert_tables_equal(actual: &Table, expected: &Table) {
    assert_eq!(
        actual.columns(),
        expected.columns(),
        "Column mismatch:\n  Expected: {:?}\n  Actual: {:?}",
        expected.columns(),
        actual.columns()
    );
    assert_eq!(
        actual.num_rows(),
        expected.num_rows(),
        "Row count mismatch:\n  Expected: {}\n  Actual: {}",
        expected.num_rows(),
        actual.num_rows()
    );
    for (i, (a, e)) in actual.rows().iter().zip(expected.rows()).enumerate() {
        for ((col, ac), ec) in actual.columns().iter().zip(a).zip(e) {
            assert_eq!(
                ac, ec,
                "Cell mismatch at row {i}, column '{col}':\n  Expected: {ec:?}\n  Actual: {ac:?}"
            );
        }
    }
}
