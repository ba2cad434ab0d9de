//! Transform engine: min-max normalization and z-score standardization.
//!
//! For every selected column `c` the engine appends a derived column
//! `c_NORM` (`(v - min) / (max - min)`) or `c_STD` (`(v - mean) / std`),
//! then optionally drops the sources.
//!
//! All derived columns are computed before the table is touched, so a
//! failing column leaves the table exactly as it was and `drop_old` never
//! removes a source that is still needed.
//!
//! ## Options
//!
//! | Option | Values | Default |
//! |--------|--------|---------|
//! | `write_mode` | `copy`, `in_place` | `copy` |
//! | `resolution` | `resolved`, `raw` | `resolved` |
//! | `degenerate` | `strict`, `lenient` | `strict` |
//! | `ddof` | delta degrees of freedom for `std` | `1` |

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::selector::{resolve_with, ColumnSelector, Resolution};
use super::stats::ColumnStats;
use crate::error::{TransformError, TransformResult};
use crate::logs::{log_info_indent, log_warning};
use crate::table::{Column, Table};

/// The two column transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// `(v - min) / (max - min)`, suffix `_NORM`
    Normalize,
    /// `(v - mean) / std`, suffix `_STD`
    Standardize,
}

impl TransformKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            TransformKind::Normalize => "_NORM",
            TransformKind::Standardize => "_STD",
        }
    }

    /// Name of the column derived from `source`.
    pub fn derived_name(&self, source: &str) -> String {
        format!("{}{}", source, self.suffix())
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::Normalize => "normalize",
            TransformKind::Standardize => "standardize",
        };
        f.write_str(name)
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normalize" => Ok(TransformKind::Normalize),
            "standardize" => Ok(TransformKind::Standardize),
            other => Err(format!("unknown transform '{}'", other)),
        }
    }
}

/// Whether the caller's table is mutated or copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Leave the caller's table untouched and return a modified copy.
    #[default]
    #[serde(rename = "copy")]
    CopyOnWrite,
    /// Mutate the caller's table.
    InPlace,
}

/// What happens when a column has zero range or zero variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with [`TransformError::DegenerateColumn`].
    #[default]
    Strict,
    /// Keep the non-finite division results and log a warning.
    Lenient,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub write_mode: WriteMode,
    pub resolution: Resolution,
    pub degenerate: DegeneratePolicy,
    pub ddof: u8,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            write_mode: WriteMode::default(),
            resolution: Resolution::default(),
            degenerate: DegeneratePolicy::default(),
            ddof: 1,
        }
    }
}

impl EngineOptions {
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_degenerate(mut self, degenerate: DegeneratePolicy) -> Self {
        self.degenerate = degenerate;
        self
    }

    pub fn with_ddof(mut self, ddof: u8) -> Self {
        self.ddof = ddof;
        self
    }
}

/// What a single transform call did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub kind: TransformKind,
    /// Source columns, in processing order
    pub columns: Vec<String>,
    /// Derived column names, aligned with `columns`
    pub derived: Vec<String>,
    /// Source columns removed by `drop_old`
    pub dropped: Vec<String>,
    /// Columns whose derived values are non-finite (lenient mode only)
    pub degenerate: Vec<String>,
}

/// Applies normalize/standardize transforms to tables.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    options: EngineOptions,
}

impl TransformEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Apply `kind` to the selected columns.
    ///
    /// With [`WriteMode::CopyOnWrite`] the caller's table is left untouched
    /// and an owned copy is returned; with [`WriteMode::InPlace`] the
    /// caller's table is modified and returned by reference.
    ///
    /// # Example
    /// ```
    /// use tabprep::{Column, ColumnSelector, Table, TransformEngine, TransformKind};
    ///
    /// let mut table = Table::from_columns(vec![Column::float("x", vec![1.0, 3.0])]).unwrap();
    /// let engine = TransformEngine::default();
    /// let sel = ColumnSelector::from("x");
    /// let out = engine.apply(&mut table, Some(&sel), TransformKind::Normalize, false).unwrap();
    ///
    /// assert_eq!(out.column("x_NORM").unwrap().as_float(), Some(&[0.0, 1.0][..]));
    /// ```
    pub fn apply<'t>(
        &self,
        table: &'t mut Table,
        columns: Option<&ColumnSelector>,
        kind: TransformKind,
        drop_old: bool,
    ) -> TransformResult<Cow<'t, Table>> {
        match self.options.write_mode {
            WriteMode::CopyOnWrite => {
                let mut copy = table.clone();
                self.apply_to(&mut copy, columns, kind, drop_old)?;
                Ok(Cow::Owned(copy))
            }
            WriteMode::InPlace => {
                self.apply_to(table, columns, kind, drop_old)?;
                let shared: &'t Table = table;
                Ok(Cow::Borrowed(shared))
            }
        }
    }

    /// Add `_NORM` columns for the selected columns.
    pub fn normalize<'t>(
        &self,
        table: &'t mut Table,
        columns: Option<&ColumnSelector>,
        drop_old: bool,
    ) -> TransformResult<Cow<'t, Table>> {
        self.apply(table, columns, TransformKind::Normalize, drop_old)
    }

    /// Add `_STD` columns for the selected columns.
    pub fn standardize<'t>(
        &self,
        table: &'t mut Table,
        columns: Option<&ColumnSelector>,
        drop_old: bool,
    ) -> TransformResult<Cow<'t, Table>> {
        self.apply(table, columns, TransformKind::Standardize, drop_old)
    }

    /// Apply `kind` directly to `table`, regardless of the write mode.
    ///
    /// Either every derived column is added (and sources dropped if asked)
    /// or, on error, the table is unchanged.
    pub fn apply_to(
        &self,
        table: &mut Table,
        columns: Option<&ColumnSelector>,
        kind: TransformKind,
        drop_old: bool,
    ) -> TransformResult<StepReport> {
        let sources = resolve_with(table, columns, self.options.resolution)?;

        let mut derived = Vec::with_capacity(sources.len());
        let mut degenerate = Vec::new();
        for source in &sources {
            let (column, is_degenerate) = self.derive(table, source, kind)?;
            if is_degenerate {
                degenerate.push(source.clone());
            }
            derived.push(column);
        }

        let derived_names: Vec<String> = derived.iter().map(|c| c.name.clone()).collect();
        for (source, column) in sources.iter().zip(derived) {
            log_info_indent(format!("{} → {}", source, column.name), 1);
            table.insert_column(column)?;
        }

        let mut dropped = Vec::new();
        if drop_old {
            // A source that was just rewritten as a derived column stays.
            dropped = sources
                .iter()
                .filter(|s| !derived_names.contains(s))
                .cloned()
                .collect();
            table.drop_columns(&dropped);
        }

        Ok(StepReport {
            kind,
            columns: sources,
            derived: derived_names,
            dropped,
            degenerate,
        })
    }

    /// Compute the derived column for one source.
    fn derive(
        &self,
        table: &Table,
        source: &str,
        kind: TransformKind,
    ) -> TransformResult<(Column, bool)> {
        let column = table
            .column(source)
            .ok_or_else(|| TransformError::MissingColumn(source.to_string()))?;
        let values = column
            .as_float()
            .ok_or_else(|| TransformError::NonNumericColumn {
                column: source.to_string(),
                dtype: column.dtype().to_string(),
            })?;

        let stats = ColumnStats::compute(values, self.options.ddof);
        let (center, scale) = match kind {
            TransformKind::Normalize => (stats.min, stats.range()),
            TransformKind::Standardize => (stats.mean, stats.std),
        };

        let is_degenerate = scale == 0.0 || scale.is_nan();
        if is_degenerate {
            match self.options.degenerate {
                DegeneratePolicy::Strict => {
                    return Err(TransformError::DegenerateColumn {
                        column: source.to_string(),
                        kind,
                    });
                }
                DegeneratePolicy::Lenient => {
                    log_warning(format!(
                        "Column '{}' is degenerate for {}, derived values are not finite",
                        source, kind
                    ));
                }
            }
        }

        let scaled = values.iter().map(|v| (v - center) / scale).collect();
        Ok((Column::float(kind.derived_name(source), scaled), is_degenerate))
    }
}

/// Normalize with default options (copy-on-write, resolved columns, strict).
pub fn normalize(
    table: &Table,
    columns: Option<&ColumnSelector>,
    drop_old: bool,
) -> TransformResult<Table> {
    let mut copy = table.clone();
    TransformEngine::default().apply_to(&mut copy, columns, TransformKind::Normalize, drop_old)?;
    Ok(copy)
}

/// Standardize with default options (copy-on-write, resolved columns, strict).
pub fn standardize(
    table: &Table,
    columns: Option<&ColumnSelector>,
    drop_old: bool,
) -> TransformResult<Table> {
    let mut copy = table.clone();
    TransformEngine::default().apply_to(&mut copy, columns, TransformKind::Standardize, drop_old)?;
    Ok(copy)
}
