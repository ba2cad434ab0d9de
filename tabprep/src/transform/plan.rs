//! Transform plan definition
//!
//! A plan is an ordered list of transform steps that can be stored as JSON
//! and replayed against any table with matching columns.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::engine::TransformKind;
use super::selector::{canonicalize, ColumnSelector, MissingPolicy};
use crate::error::PlanResult;

/// A complete transform plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    /// Version of the plan format
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Steps, applied in order
    pub steps: Vec<TransformStep>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// One transform call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    pub kind: TransformKind,

    /// Target columns; absent means every column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnSelector>,

    /// Remove the source columns once derived columns are added
    #[serde(default)]
    pub drop_old: bool,
}

impl TransformStep {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            columns: None,
            drop_old: false,
        }
    }

    pub fn with_columns(mut self, columns: impl Into<ColumnSelector>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn drop_old(mut self) -> Self {
        self.drop_old = true;
        self
    }
}

impl TransformPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self {
            version: default_version(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: TransformStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Parse a plan from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a plan from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Explicitly named columns that are neither in `headers` nor produced
    /// by an earlier step.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        let mut available: Vec<String> = headers.to_vec();
        let mut missing = Vec::new();

        for step in &self.steps {
            let requested = canonicalize(step.columns.as_ref(), MissingPolicy::Coerce)
                .ok()
                .flatten()
                .unwrap_or_default();

            for col in &requested {
                if !available.contains(col) && !missing.contains(col) {
                    missing.push(col.clone());
                }
            }

            let targets: Vec<String> = if step.columns.is_some() {
                requested.into_iter().filter(|c| available.contains(c)).collect()
            } else {
                available.clone()
            };
            for col in &targets {
                let derived = step.kind.derived_name(col);
                if !available.contains(&derived) {
                    available.push(derived);
                }
            }
            if step.drop_old {
                available.retain(|c| !targets.contains(c));
            }
        }

        missing
    }
}

impl Default for TransformPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate an example plan for documentation
pub fn example_plan() -> TransformPlan {
    TransformPlan {
        version: default_version(),
        description: "Scale price and area to [0, 1], standardize age".to_string(),
        steps: vec![
            TransformStep::new(TransformKind::Normalize)
                .with_columns(vec!["price", "area"])
                .drop_old(),
            TransformStep::new(TransformKind::Standardize).with_columns("age"),
        ],
    }
}
