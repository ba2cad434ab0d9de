//! Table serialization: CSV and JSON records.

use serde_json::{Map, Number, Value};
use std::io::Write;

use super::{Column, ColumnData, Table, FALSE_VALUES, TRUE_VALUES};

impl Column {
    /// Cell as a JSON value. Missing and non-finite cells become `null`.
    pub fn cell_value(&self, row: usize) -> Value {
        match &self.data {
            ColumnData::Float(v) => v
                .get(row)
                .and_then(|f| Number::from_f64(*f))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnData::Bool(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            ColumnData::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }

    /// Cell as CSV text. Missing cells and NaN are empty; booleans use the
    /// first word of the default vocabulary so the file reads back as bool.
    pub fn cell_text(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Float(v) => match v.get(row) {
                Some(f) if f.is_nan() => String::new(),
                Some(f) => format!("{:?}", f),
                None => String::new(),
            },
            ColumnData::Bool(v) => match v.get(row).copied().flatten() {
                Some(true) => TRUE_VALUES[0].to_string(),
                Some(false) => FALSE_VALUES[0].to_string(),
                None => String::new(),
            },
            ColumnData::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

impl Table {
    /// Write the table as CSV with a header row.
    pub fn to_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(self.columns().map(|c| c.name.as_str()))?;
        for row in 0..self.n_rows() {
            wtr.write_record(self.columns().map(|c| c.cell_text(row)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Convert to an array of row objects keyed by column name.
    ///
    /// # Example
    /// ```ignore
    /// let records = table.to_records();
    /// assert_eq!(records[0]["price"], 1.5);
    /// ```
    pub fn to_records(&self) -> Vec<Value> {
        (0..self.n_rows())
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns()
                    .map(|c| (c.name.clone(), c.cell_value(row)))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::float("x", vec![0.25, f64::NAN]),
            Column::boolean("ok", vec![Some(true), None]),
            Column::text("name", vec![Some("a,b".into()), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_to_csv() {
        let mut out = Vec::new();
        sample().to_csv(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "x,ok,name\n0.25,Yes,\"a,b\"\n,,\n");
    }

    #[test]
    fn test_csv_reload_keeps_types() {
        let table = Table::from_columns(vec![
            Column::float("x", vec![1.5, f64::NAN, -2.0]),
            Column::boolean("ok", vec![Some(true), Some(false), None]),
            Column::text("name", vec![Some("a".into()), Some("b".into()), Some("c".into())]),
        ])
        .unwrap();

        let mut out = Vec::new();
        table.to_csv(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        let reloaded = crate::parser::parse_str(&text, ',', &Default::default()).unwrap();

        assert_eq!(reloaded.column_names(), table.column_names());
        assert_eq!(reloaded.column("ok").unwrap().data, table.column("ok").unwrap().data);
        assert_eq!(reloaded.column("name").unwrap().data, table.column("name").unwrap().data);
        let x = reloaded.column("x").unwrap().as_float().unwrap();
        assert_eq!(x[0], 1.5);
        assert!(x[1].is_nan());
        assert_eq!(x[2], -2.0);
    }

    #[test]
    fn test_records_keep_column_order() {
        let table = Table::from_columns(vec![
            Column::float("zeta", vec![1.0]),
            Column::float("alpha", vec![2.0]),
            Column::float("mid", vec![3.0]),
        ])
        .unwrap();

        let records = table.to_records();
        let keys: Vec<&String> = records[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&records[0]).unwrap(),
            r#"{"zeta":1.0,"alpha":2.0,"mid":3.0}"#
        );
    }

    #[test]
    fn test_to_records_nulls() {
        let records = sample().to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["x"], 0.25);
        assert_eq!(records[0]["ok"], true);
        assert_eq!(records[1]["x"], Value::Null);
        assert_eq!(records[1]["name"], Value::Null);
    }
}
