//! Tabular sources the expectation engine evaluates against.
//!
//! The engine only ever sees the [`TabularSource`] trait: ordered columns of
//! JSON values with [`serde_json::Value::Null`] as the missing marker. The
//! concrete implementations here cover in-memory construction, Arrow record
//! batches, and CSV files.

use serde_json::Value;

mod csv;
mod record_batch;

pub use csv::read_csv;

use crate::error::{DatavowError, Result};

/// The column-store contract the engine needs from a dataset.
///
/// Implementations expose one snapshot: evaluation never mutates a source,
/// and a source is free to be backed by anything that can hand out column
/// slices.
pub trait TabularSource {
    /// Column names, in table order.
    fn column_names(&self) -> Vec<&str>;

    /// The values of a column, or `None` when the column does not exist.
    fn column(&self, name: &str) -> Option<&[Value]>;

    /// Number of rows in the snapshot.
    fn row_count(&self) -> usize;

    /// Whether a column exists.
    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// An owned, ordered set of named columns.
///
/// The reference [`TabularSource`] implementation: every column is a
/// `Vec<Value>` of equal length, with `Value::Null` marking missing cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InMemoryTable {
    columns: Vec<(String, Vec<Value>)>,
}

impl InMemoryTable {
    /// Creates a table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, values)` pairs.
    ///
    /// Fails on ragged columns or duplicate names.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Appends a column, enforcing the uniform row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(DatavowError::invalid_parameter(format!(
                "duplicate column name: {name}"
            )));
        }
        if let Some((first_name, first)) = self.columns.first() {
            if first.len() != values.len() {
                return Err(DatavowError::invalid_parameter(format!(
                    "column {name} has {} rows but {first_name} has {}",
                    values.len(),
                    first.len()
                )));
            }
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Appends another table's rows to this one.
    ///
    /// Both tables must have identical column names in identical order.
    pub fn extend_rows(&mut self, other: InMemoryTable) -> Result<()> {
        if self.column_names() != other.column_names() {
            return Err(DatavowError::invalid_parameter(
                "cannot append rows: column layouts differ",
            ));
        }
        for ((_, target), (_, extra)) in self.columns.iter_mut().zip(other.columns) {
            target.extend(extra);
        }
        Ok(())
    }
}

impl TabularSource for InMemoryTable {
    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(column_name, _)| column_name == name)
            .map(|(_, values)| values.as_slice())
    }

    fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }
}
