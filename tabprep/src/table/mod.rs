//! In-memory table model.
//!
//! A [`Table`] is an ordered collection of named, typed [`Column`]s whose
//! rows are positionally aligned:
//!
//! - [`Column`] - A named column and its values
//! - [`ColumnData`] - Typed storage (float, boolean, text)
//! - [`DType`] - Logical type tag used in messages and listings
//!
//! Missing numeric cells are stored as NaN, missing boolean and text cells
//! as `None`.

pub mod infer;
pub mod write;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TableError, TableResult};

pub use infer::{infer_column, BoolVocabulary, FALSE_VALUES, TRUE_VALUES};

// =============================================================================
// Logical Types
// =============================================================================

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float,
    Bool,
    Text,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Float => "float",
            DType::Bool => "bool",
            DType::Text => "text",
        };
        f.write_str(name)
    }
}

/// Typed column storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<f64>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            ColumnData::Float(_) => DType::Float,
            ColumnData::Bool(_) => DType::Bool,
            ColumnData::Text(_) => DType::Text,
        }
    }
}

// =============================================================================
// Column
// =============================================================================

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Numeric column; use `f64::NAN` for missing cells.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Bool(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Numeric values, if this is a float column.
    pub fn as_float(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// Rectangular table of uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, checking that every column has the same length and
    /// that names are unique.
    pub fn from_columns(columns: Vec<Column>) -> TableResult<Self> {
        let mut table = Self::new();
        for column in columns {
            if table.contains(&column.name) {
                return Err(TableError::DuplicateColumn(column.name));
            }
            table.insert_column(column)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column identifiers in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Insert a column, replacing an existing column of the same name in
    /// its current position, or appending it otherwise.
    pub fn insert_column(&mut self, column: Column) -> TableResult<()> {
        let found = column.len();
        if !self.columns.is_empty() && found != self.n_rows() {
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.n_rows(),
                found,
            });
        }

        match self.position(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Remove the named columns. Unknown names are ignored.
    ///
    /// Returns the number of columns removed.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let before = self.columns.len();
        self.columns
            .retain(|c| !names.iter().any(|n| n.as_ref() == c.name));
        before - self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::float("a", vec![1.0, 2.0]),
            Column::boolean("b", vec![Some(true), None]),
            Column::text("c", vec![Some("x".into()), Some("y".into())]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_names() {
        let table = sample();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.column("b").unwrap().dtype(), DType::Bool);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut table = sample();
        let err = table
            .insert_column(Column::float("d", vec![1.0]))
            .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "d".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_columns_ragged_rejected() {
        let result = Table::from_columns(vec![
            Column::float("a", vec![1.0, 2.0, 3.0]),
            Column::text("b", vec![Some("x".into())]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            TableError::LengthMismatch {
                column: "b".into(),
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = Table::from_columns(vec![
            Column::float("a", vec![1.0]),
            Column::float("a", vec![2.0]),
        ]);
        assert_eq!(result.unwrap_err(), TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = sample();
        table.insert_column(Column::float("a", vec![9.0, 8.0])).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.column("a").unwrap().as_float(), Some(&[9.0, 8.0][..]));
    }

    #[test]
    fn test_drop_columns() {
        let mut table = sample();
        let removed = table.drop_columns(&["a", "zzz"]);
        assert_eq!(removed, 1);
        assert_eq!(table.column_names(), vec!["b", "c"]);
    }
}
