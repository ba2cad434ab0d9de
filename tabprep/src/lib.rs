//! # tabprep - Tabular dataset loading and column scaling
//!
//! tabprep loads CSV and Excel datasets from a data directory into typed
//! in-memory tables and appends min-max normalized (`_NORM`) or z-score
//! standardized (`_STD`) versions of selected columns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV / XLSX │────▶│   Loader    │────▶│   Engine    │────▶│  CSV / JSON │
//! │  (data dir) │     │  (auto-enc) │     │ (NORM / STD)│     │   output    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabprep::{DataDir, ColumnSelector, TransformEngine};
//!
//! let mut table = DataDir::new("../data").load_table("housing")?;
//! let engine = TransformEngine::default();
//! let scaled = engine.normalize(&mut table, Some(&ColumnSelector::from("price")), false)?;
//! println!("{:?}", scaled.column_names());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`table`] - Table model, type inference, writers
//! - [`parser`] - CSV and spreadsheet parsing
//! - [`loader`] - Dataset resolution in a data directory
//! - [`transform`] - Selectors, engine, plans, pipeline
//! - [`config`] - Environment configuration
//! - [`logs`] - Log broadcasting
//!
//! ## Progress logs
//!
//! Everything the loader, engine and pipeline log is printed to stderr and
//! also published on a broadcast channel. Embedders subscribe with
//! [`subscribe_logs`] and receive [`LogEntry`] values (level, message,
//! indent) as they are emitted.

// Core modules
pub mod error;
pub mod table;

// Loading
pub mod loader;
pub mod parser;

// Transformation
pub mod transform;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    LoadError, PipelineError, PlanError, SelectError, TableError, TransformError,
};

// =============================================================================
// Re-exports - Table
// =============================================================================

pub use table::{BoolVocabulary, Column, ColumnData, DType, Table, FALSE_VALUES, TRUE_VALUES};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use loader::{DataDir, DEFAULT_DATA_DIR};
pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto,
    ExcelOptions, ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    canonicalize, example_plan, normalize, resolve_columns, standardize, ColumnSelector,
    ColumnStats, DegeneratePolicy, EngineOptions, MissingPolicy, Resolution, StepReport,
    TransformEngine, TransformKind, TransformPlan, TransformStep, WriteMode,
};

pub use transform::pipeline::{run, run_dataset, PipelineOutput, RunSummary};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{Config, ConfigError};

// =============================================================================
// Re-exports - Logs
// =============================================================================

pub use logs::{subscribe_logs, LogEntry, LogLevel};
