//! Column selectors: canonicalization and resolution against a table.
//!
//! A selector is either absent (`None`), a single column identifier, or a
//! list of identifiers. [`canonicalize`] turns it into one list shape;
//! [`resolve_columns`] intersects it with a table's real columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SelectError, SelectResult, TransformError, TransformResult};
use crate::logs::log_warning;
use crate::table::Table;

/// User-supplied column selection: one identifier or a list of them.
///
/// Deserializes from either a JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    One(String),
    Many(Vec<String>),
}

impl ColumnSelector {
    fn to_vec(&self) -> Vec<String> {
        match self {
            ColumnSelector::One(c) => vec![c.clone()],
            ColumnSelector::Many(cs) => cs.clone(),
        }
    }
}

impl From<&str> for ColumnSelector {
    fn from(c: &str) -> Self {
        ColumnSelector::One(c.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(c: String) -> Self {
        ColumnSelector::One(c)
    }
}

impl From<Vec<String>> for ColumnSelector {
    fn from(cs: Vec<String>) -> Self {
        ColumnSelector::Many(cs)
    }
}

impl From<Vec<&str>> for ColumnSelector {
    fn from(cs: Vec<&str>) -> Self {
        ColumnSelector::Many(cs.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for ColumnSelector {
    fn from(cs: &[&str]) -> Self {
        ColumnSelector::Many(cs.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSelector {
    fn from(cs: [&str; N]) -> Self {
        ColumnSelector::Many(cs.iter().map(|c| c.to_string()).collect())
    }
}

/// What [`canonicalize`] does when no selector is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Return `None`.
    #[default]
    Ignore,
    /// Fail with [`SelectError::InvalidArgument`].
    Raise,
    /// Return an empty list.
    Coerce,
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingPolicy::Ignore => "ignore",
            MissingPolicy::Raise => "raise",
            MissingPolicy::Coerce => "coerce",
        };
        f.write_str(name)
    }
}

impl FromStr for MissingPolicy {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(MissingPolicy::Ignore),
            "raise" => Ok(MissingPolicy::Raise),
            "coerce" => Ok(MissingPolicy::Coerce),
            other => Err(SelectError::InvalidArgument(format!(
                "unknown errors policy '{}', expected ignore, raise or coerce",
                other
            ))),
        }
    }
}

/// Canonicalize a selector into a list of identifiers.
///
/// Lists keep their order and duplicates; a single identifier becomes a
/// one-element list. An absent selector follows `errors`.
///
/// # Example
/// ```
/// use tabprep::{canonicalize, ColumnSelector, MissingPolicy};
///
/// let one = ColumnSelector::from("price");
/// assert_eq!(canonicalize(Some(&one), MissingPolicy::Ignore).unwrap(), Some(vec!["price".to_string()]));
/// assert_eq!(canonicalize(None, MissingPolicy::Coerce).unwrap(), Some(vec![]));
/// assert_eq!(canonicalize(None, MissingPolicy::Ignore).unwrap(), None);
/// assert!(canonicalize(None, MissingPolicy::Raise).is_err());
/// ```
pub fn canonicalize(
    item: Option<&ColumnSelector>,
    errors: MissingPolicy,
) -> SelectResult<Option<Vec<String>>> {
    match (item, errors) {
        (Some(selector), _) => Ok(Some(selector.to_vec())),
        (None, MissingPolicy::Ignore) => Ok(None),
        (None, MissingPolicy::Coerce) => Ok(Some(Vec::new())),
        (None, MissingPolicy::Raise) => Err(SelectError::InvalidArgument(
            "a column list is required but none was given".to_string(),
        )),
    }
}

/// How the engine turns a selector into the columns it processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Intersect with the table's columns, in table order.
    #[default]
    Resolved,
    /// Use the caller's list as given; unknown columns are an error.
    Raw,
}

/// Resolve a selector against a table's columns.
///
/// An absent selector selects every column. Otherwise the result keeps the
/// table's column order and silently drops identifiers the table does not
/// have.
pub fn resolve_columns(table: &Table, selector: Option<&ColumnSelector>) -> Vec<String> {
    let requested = match canonicalize(selector, MissingPolicy::Ignore) {
        Ok(Some(list)) => list,
        _ => return table.column_names(),
    };

    let unknown: Vec<&String> = requested.iter().filter(|c| !table.contains(c)).collect();
    if !unknown.is_empty() {
        log_warning(format!(
            "Ignoring columns not in table: {}",
            unknown.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
        ));
    }

    table
        .column_names()
        .into_iter()
        .filter(|c| requested.contains(c))
        .collect()
}

/// Resolve a selector using the given [`Resolution`] mode.
pub fn resolve_with(
    table: &Table,
    selector: Option<&ColumnSelector>,
    mode: Resolution,
) -> TransformResult<Vec<String>> {
    match mode {
        Resolution::Resolved => Ok(resolve_columns(table, selector)),
        Resolution::Raw => match canonicalize(selector, MissingPolicy::Ignore)? {
            None => Ok(table.column_names()),
            Some(list) => {
                if let Some(missing) = list.iter().find(|c| !table.contains(c)) {
                    return Err(TransformError::MissingColumn(missing.clone()));
                }
                Ok(list)
            }
        },
    }
}
