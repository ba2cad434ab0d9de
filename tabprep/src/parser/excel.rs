//! Spreadsheet (xlsx/xls/ods) reading via calamine.

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::table::{BoolVocabulary, Column, Table};

/// Options for reading a workbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcelOptions {
    /// Sheet to read (default: first sheet)
    #[serde(default)]
    pub sheet: Option<String>,
}

impl ExcelOptions {
    pub fn sheet(name: impl Into<String>) -> Self {
        Self {
            sheet: Some(name.into()),
        }
    }
}

/// A spreadsheet cell reduced to what the table model distinguishes.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.trim().to_string()),
            Data::Empty | Data::Error(_) => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Read one sheet of a workbook into a table.
///
/// The first non-empty row is the header; fully empty rows are skipped.
pub fn parse_workbook(path: &Path, options: &ExcelOptions, vocab: &BoolVocabulary) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(LoadError::EmptyFile)?,
    };
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| *c != Cell::Empty));

    let header = rows.next().ok_or(LoadError::EmptyFile)?;
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Cell::Empty => format!("Unnamed: {}", i),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Text(s) => s.clone(),
        })
        .collect();

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).cloned().unwrap_or(Cell::Empty));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| build_column(name, values, vocab))
        .collect();

    Ok(Table::from_columns(columns)?)
}

/// Numeric if every non-empty cell is a number, boolean if every non-empty
/// cell is a bool or a vocabulary word, text otherwise.
fn build_column(name: String, cells: Vec<Cell>, vocab: &BoolVocabulary) -> Column {
    let present = || cells.iter().filter(|c| **c != Cell::Empty);

    if present().all(|c| matches!(c, Cell::Number(_))) {
        let values = cells
            .iter()
            .map(|c| match c {
                Cell::Number(n) => *n,
                _ => f64::NAN,
            })
            .collect();
        return Column::float(name, values);
    }

    let as_bool = |c: &Cell| match c {
        Cell::Bool(b) => Some(*b),
        Cell::Text(s) => vocab.parse(s),
        _ => None,
    };
    if present().all(|c| as_bool(c).is_some()) {
        return Column::boolean(name, cells.iter().map(as_bool).collect());
    }

    let values = cells
        .into_iter()
        .map(|c| match c {
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Text(s) => Some(s),
            Cell::Empty => None,
        })
        .collect();
    Column::text(name, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnData;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn cells(data: &[Data]) -> Vec<Cell> {
        data.iter().map(Cell::from).collect()
    }

    #[test]
    fn test_numeric_cells() {
        let col = build_column(
            "price".into(),
            cells(&[Data::Int(3), Data::Empty, Data::Float(1.5)]),
            &BoolVocabulary::default(),
        );
        let values = col.as_float().unwrap();
        assert_eq!(values[0], 3.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 1.5);
    }

    #[test]
    fn test_bool_and_vocabulary_cells() {
        let col = build_column(
            "garage".into(),
            cells(&[Data::Bool(true), Data::String("No".into()), Data::String(" ".into())]),
            &BoolVocabulary::default(),
        );
        assert_eq!(col.data, ColumnData::Bool(vec![Some(true), Some(false), None]));
    }

    #[test]
    fn test_mixed_cells_are_text() {
        let col = build_column(
            "code".into(),
            cells(&[Data::Int(7), Data::String("A7".into())]),
            &BoolVocabulary::default(),
        );
        assert_eq!(
            col.data,
            ColumnData::Text(vec![Some("7".into()), Some("A7".into())])
        );
    }

    fn write_listings(path: &Path) {
        let mut book = Workbook::new();

        let sheet = book.add_worksheet();
        sheet.set_name("summary").unwrap();
        sheet.write_string(0, 0, "note").unwrap();

        let sheet = book.add_worksheet();
        sheet.set_name("listings").unwrap();
        // Leading row holding only whitespace
        sheet.write_string(0, 0, " ").unwrap();
        sheet.write_string(1, 0, "price").unwrap();
        sheet.write_string(1, 2, "furnished").unwrap();
        sheet.write_number(2, 0, 100.0).unwrap();
        sheet.write_number(2, 1, 1.0).unwrap();
        sheet.write_boolean(2, 2, true).unwrap();
        sheet.write_number(4, 0, 300.0).unwrap();
        sheet.write_number(4, 1, 3.0).unwrap();
        sheet.write_string(4, 2, "No").unwrap();

        book.save(path).unwrap();
    }

    #[test]
    fn test_named_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_listings(&path);

        let table = parse_workbook(&path, &ExcelOptions::sheet("listings"), &BoolVocabulary::default()).unwrap();

        assert_eq!(table.column_names(), vec!["price", "Unnamed: 1", "furnished"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("price").unwrap().as_float(), Some(&[100.0, 300.0][..]));
        assert_eq!(table.column("Unnamed: 1").unwrap().as_float(), Some(&[1.0, 3.0][..]));
        assert_eq!(
            table.column("furnished").unwrap().data,
            ColumnData::Bool(vec![Some(true), Some(false)])
        );
    }

    #[test]
    fn test_first_sheet_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_listings(&path);

        let table = parse_workbook(&path, &ExcelOptions::default(), &BoolVocabulary::default()).unwrap();
        assert_eq!(table.column_names(), vec!["note"]);
        assert_eq!(table.n_rows(), 0);
    }

    #[test]
    fn test_unknown_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_listings(&path);

        let err = parse_workbook(&path, &ExcelOptions::sheet("nope"), &BoolVocabulary::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn test_missing_workbook() {
        let result = parse_workbook(
            Path::new("/nonexistent/book.xlsx"),
            &ExcelOptions::default(),
            &BoolVocabulary::default(),
        );
        assert!(result.is_err());
    }
}
