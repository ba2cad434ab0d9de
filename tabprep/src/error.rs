//! Error types for the tabprep loading and transform pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`TableError`] - Table shape errors
//! - [`SelectError`] - Column selector canonicalization errors
//! - [`TransformError`] - Normalize/standardize errors
//! - [`LoadError`] - Dataset resolution and parsing errors
//! - [`PlanError`] - Transform plan (de)serialization errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::transform::TransformKind;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors that would break a table's rectangular shape or name uniqueness.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    /// Column length differs from the table's row count.
    #[error("Column '{column}' has {found} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns share an identifier.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
}

// =============================================================================
// Selector Errors
// =============================================================================

/// Errors while canonicalizing a column selector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectError {
    /// No selector was given but a list was required.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors while applying a column transform.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// Selector canonicalization failed.
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Zero range (normalize) or zero/undefined variance (standardize).
    #[error("Degenerate column '{column}': {kind} denominator is zero")]
    DegenerateColumn { column: String, kind: TransformKind },

    /// Requested column is not part of the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Transforms only apply to numeric columns.
    #[error("Column '{column}' is not numeric (found {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    /// Derived column could not be added.
    #[error(transparent)]
    Table(#[from] TableError),
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while resolving and parsing a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No file matched the dataset name.
    #[error("Dataset '{name}' not found in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed content.
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("File is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found")]
    NoHeaders,

    /// Parsed columns do not form a valid table.
    #[error("Invalid table: {0}")]
    Table(#[from] TableError),

    /// Spreadsheet could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl LoadError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        LoadError::ParseError {
            line,
            message: message.into(),
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        let line = e
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        LoadError::parse(line, e.to_string())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(e: calamine::Error) -> Self {
        LoadError::Spreadsheet(e.to_string())
    }
}

// =============================================================================
// Plan Errors
// =============================================================================

/// Errors while reading or writing a transform plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// IO error.
    #[error("Plan IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Plan JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::run`].
/// Loader errors pass through unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dataset loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Transform error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Plan error.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Output serialization error.
    #[error("Output error: {0}")]
    Output(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Output(e.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Output(e.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for selector operations.
pub type SelectResult<T> = Result<T, SelectError>;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SelectError -> TransformError -> PipelineError
        let select_err = SelectError::InvalidArgument("columns required".into());
        let transform_err: TransformError = select_err.into();
        assert_eq!(transform_err.to_string(), "Invalid argument: columns required");

        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("columns required"));

        // LoadError -> PipelineError
        let load_err = LoadError::NotFound {
            name: "housing".into(),
            dir: PathBuf::from("../data"),
        };
        let pipeline_err: PipelineError = load_err.into();
        assert!(pipeline_err.to_string().contains("housing"));
    }

    #[test]
    fn test_degenerate_format() {
        let err = TransformError::DegenerateColumn {
            column: "price".into(),
            kind: TransformKind::Normalize,
        };
        let msg = err.to_string();
        assert!(msg.contains("price"));
        assert!(msg.contains("normalize"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = LoadError::parse(7, "expected 3 fields, found 4");
        assert_eq!(err.to_string(), "Parse error at line 7: expected 3 fields, found 4");
    }
}
