//! In-memory tabular payload exchanged between callers and adapters.
//!
//! A [`Table`] is an ordered list of column names plus rows of scalar
//! [`Cell`]s. Every row holds exactly one cell per column, and column names
//! are unique. Equality is structural: same columns in the same order, same
//! rows in the same order.
//!
//! # Canonical cell text
//!
//! Formats without a type system (CSV) store cells as text. [`Cell::infer`]
//! and [`Cell::to_field`] define the mapping in both directions:
//!
//! | text                          | cell            |
//! |-------------------------------|-----------------|
//! | empty                         | `Null`          |
//! | `true` / `false` (any case)   | `Bool`          |
//! | parses as `i64`               | `Int`           |
//! | parses as a finite `f64`      | `Float`         |
//! | anything else                 | `Str`           |
//!
//! Floats are always written with a decimal point or exponent so they do not
//! come back as integers.

use crate::error::{DataIoError, Result};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::fmt;

/// A single scalar value in a [`Table`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    /// Parse a text field using the canonical inference rules.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::Str(raw.to_string()),
        }
    }

    /// Render the cell as a text field; the inverse of [`Cell::infer`].
    #[must_use]
    pub fn to_field(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            // Debug keeps the trailing ".0" that Display drops.
            Self::Float(f) if f.is_finite() => format!("{f:?}"),
            Self::Float(f) => f.to_string(),
            Self::Str(s) => s.clone(),
        }
    }

    /// Convert a JSON scalar into a cell. Arrays and objects yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert the cell into a JSON value. Non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Rows of [`Cell`]s under named, ordered columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns.
    ///
    /// # Errors
    /// Returns [`DataIoError::InvalidTable`] if a column name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(DataIoError::InvalidTable(format!("duplicate column '{c}'")));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table and append `rows` to it.
    ///
    /// # Errors
    /// See [`Table::new`] and [`Table::push_row`].
    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<Cell>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row.
    ///
    /// # Errors
    /// Returns [`DataIoError::InvalidTable`] if the table has no columns or
    /// the row width differs from the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if self.columns.is_empty() {
            return Err(DataIoError::InvalidTable(
                "a table without columns cannot hold rows".into(),
            ));
        }
        if row.len() != self.columns.len() {
            return Err(DataIoError::InvalidTable(format!(
                "row #{} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Build a table from record objects.
    ///
    /// Columns are the union of keys in first-seen order; a record missing a
    /// key gets `Null` in that column.
    ///
    /// # Errors
    /// Returns [`DataIoError::InvalidTable`] if a value is an array or object.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let records: Vec<Map<String, Value>> = records.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for rec in &records {
            for key in rec.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        // Records without any keys carry no cells.
        if columns.is_empty() {
            return Ok(Self::default());
        }

        let mut rows = Vec::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(columns.len());
            for col in &columns {
                let cell = match rec.get(col) {
                    None => Cell::Null,
                    Some(v) => Cell::from_json(v).ok_or_else(|| {
                        DataIoError::InvalidTable(format!(
                            "record #{}: field '{col}' is not a scalar",
                            i + 1
                        ))
                    })?,
                };
                row.push(cell);
            }
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from a JSON array of objects, or a single object as one row.
    ///
    /// # Errors
    /// Returns [`DataIoError::InvalidTable`] for any other shape.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_records([map]),
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(map) => records.push(map),
                        other => {
                            return Err(DataIoError::InvalidTable(format!(
                                "record #{} is not an object: {other}",
                                i + 1
                            )));
                        }
                    }
                }
                Self::from_records(records)
            }
            other => Err(DataIoError::InvalidTable(format!(
                "expected an object or an array of objects, found {other}"
            ))),
        }
    }

    /// One JSON object per row, keys in column order.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Cell::to_json))
                    .collect()
            })
            .collect()
    }

    /// The table as a JSON array of objects.
    pub fn to_json(&self) -> Value {
        Value::Array(self.to_records().into_iter().map(Value::Object).collect())
    }
}
