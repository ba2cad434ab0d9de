//! Column type inference from raw cell text.
//!
//! A column is numeric when every non-empty cell parses as a float, boolean
//! when every non-empty cell belongs to the true/false vocabulary, and text
//! otherwise. A column with no values at all is numeric (all NaN).

use serde::{Deserialize, Serialize};

use super::{Column, ColumnData};

/// Cell values read as `true`.
pub const TRUE_VALUES: [&str; 4] = ["Yes", "yes", "y", "Y"];

/// Cell values read as `false`.
pub const FALSE_VALUES: [&str; 4] = ["No", "no", "n", "N"];

/// Strings recognised as boolean cells. Matching is exact (case-sensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolVocabulary {
    #[serde(default = "default_true_values")]
    pub true_values: Vec<String>,
    #[serde(default = "default_false_values")]
    pub false_values: Vec<String>,
}

fn default_true_values() -> Vec<String> {
    TRUE_VALUES.iter().map(|s| s.to_string()).collect()
}

fn default_false_values() -> Vec<String> {
    FALSE_VALUES.iter().map(|s| s.to_string()).collect()
}

impl Default for BoolVocabulary {
    fn default() -> Self {
        Self {
            true_values: default_true_values(),
            false_values: default_false_values(),
        }
    }
}

impl BoolVocabulary {
    pub fn parse(&self, cell: &str) -> Option<bool> {
        if self.true_values.iter().any(|v| v == cell) {
            Some(true)
        } else if self.false_values.iter().any(|v| v == cell) {
            Some(false)
        } else {
            None
        }
    }
}

/// Build a typed column from raw cells (`None` = empty cell).
pub fn infer_column(name: impl Into<String>, cells: Vec<Option<String>>, vocab: &BoolVocabulary) -> Column {
    let present = || cells.iter().flatten();

    if present().all(|c| c.parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| c.as_deref().and_then(|s| s.parse().ok()).unwrap_or(f64::NAN))
            .collect();
        return Column::float(name, values);
    }

    if present().all(|c| vocab.parse(c).is_some()) {
        let values = cells
            .iter()
            .map(|c| c.as_deref().and_then(|s| vocab.parse(s)))
            .collect();
        return Column::boolean(name, values);
    }

    Column::new(name, ColumnData::Text(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DType;

    fn cells(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect()
    }

    #[test]
    fn test_numeric_with_missing() {
        let col = infer_column("price", cells(&["1.5", "", "-3"]), &BoolVocabulary::default());
        let values = col.as_float().unwrap();
        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        assert_eq!(values[2], -3.0);
    }

    #[test]
    fn test_boolean_vocabulary() {
        let col = infer_column("furnished", cells(&["Yes", "n", "", "Y"]), &BoolVocabulary::default());
        assert_eq!(
            col.data,
            ColumnData::Bool(vec![Some(true), Some(false), None, Some(true)])
        );
    }

    #[test]
    fn test_vocabulary_is_case_sensitive() {
        let col = infer_column("flag", cells(&["YES", "no"]), &BoolVocabulary::default());
        assert_eq!(col.dtype(), DType::Text);
    }

    #[test]
    fn test_mixed_falls_back_to_text() {
        let col = infer_column("city", cells(&["Paris", "12"]), &BoolVocabulary::default());
        assert_eq!(col.dtype(), DType::Text);
    }

    #[test]
    fn test_all_empty_is_numeric() {
        let col = infer_column("empty", cells(&["", ""]), &BoolVocabulary::default());
        assert_eq!(col.dtype(), DType::Float);
        assert!(col.as_float().unwrap().iter().all(|v| v.is_nan()));
    }
}
