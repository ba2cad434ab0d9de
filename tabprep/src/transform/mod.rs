//! Column transforms.
//!
//! - Selector: canonicalize and resolve column selections
//! - Stats: NaN-skipping column statistics
//! - Engine: normalize/standardize with configurable write mode
//! - Plan: serializable list of transform steps
//! - Pipeline: load a dataset and run a plan on it

pub mod engine;
pub mod pipeline;
pub mod plan;
pub mod selector;
pub mod stats;

pub use engine::{
    normalize, standardize, DegeneratePolicy, EngineOptions, StepReport, TransformEngine,
    TransformKind, WriteMode,
};
pub use plan::{example_plan, TransformPlan, TransformStep};
pub use selector::{canonicalize, resolve_columns, resolve_with, ColumnSelector, MissingPolicy, Resolution};
pub use stats::ColumnStats;
