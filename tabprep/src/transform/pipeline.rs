//! High-level pipeline API: load a dataset and run a transform plan on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabprep::{DataDir, TransformEngine, TransformPlan};
//! use tabprep::transform::pipeline::run_dataset;
//!
//! let plan = TransformPlan::from_path("plan.json")?;
//! let output = run_dataset(&DataDir::new("../data"), "housing", &plan, &TransformEngine::default())?;
//! println!("{} columns", output.table.n_cols());
//! ```

use serde::Serialize;

use super::engine::{StepReport, TransformEngine};
use super::plan::TransformPlan;
use crate::error::PipelineResult;
use crate::loader::DataDir;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::table::Table;

/// What a plan run did to a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub columns_before: Vec<String>,
    pub columns_after: Vec<String>,
    pub steps: Vec<StepReport>,
}

/// Result of [`run_dataset`]
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: Table,
    pub summary: RunSummary,
}

/// Run every step of `plan` against `table`, in order.
///
/// The table is modified directly; the engine's write mode does not apply
/// since the caller hands over the table for the whole run. Steps are
/// atomic, but a failing step leaves the effects of earlier steps in place.
pub fn run(table: &mut Table, plan: &TransformPlan, engine: &TransformEngine) -> PipelineResult<RunSummary> {
    let columns_before = table.column_names();

    let missing = plan.missing_columns(&columns_before);
    if !missing.is_empty() {
        log_warning(format!("Plan references unknown columns: {}", missing.join(", ")));
    }

    let mut steps = Vec::with_capacity(plan.steps.len());
    for (i, step) in plan.steps.iter().enumerate() {
        log_info(format!("⚙️  Step {}/{}: {}", i + 1, plan.steps.len(), step.kind));
        let report = engine
            .apply_to(table, step.columns.as_ref(), step.kind, step.drop_old)
            .map_err(|e| {
                log_error(format!("Step {} failed: {}", i + 1, e));
                e
            })?;
        log_success(format!(
            "{} derived column(s){}",
            report.derived.len(),
            if report.dropped.is_empty() {
                String::new()
            } else {
                format!(", dropped {}", report.dropped.join(", "))
            }
        ));
        if !report.degenerate.is_empty() {
            log_warning(format!("Non-finite output for: {}", report.degenerate.join(", ")));
        }
        steps.push(report);
    }

    Ok(RunSummary {
        rows: table.n_rows(),
        columns_before,
        columns_after: table.column_names(),
        steps,
    })
}

/// Load `name` from `data_dir` and run `plan` on it.
///
/// Loader errors (not found, malformed file) are returned unchanged inside
/// [`crate::error::PipelineError::Load`].
pub fn run_dataset(
    data_dir: &DataDir,
    name: &str,
    plan: &TransformPlan,
    engine: &TransformEngine,
) -> PipelineResult<PipelineOutput> {
    let mut table = data_dir.load_table(name)?;
    let summary = run(&mut table, plan, engine)?;
    Ok(PipelineOutput { table, summary })
}
