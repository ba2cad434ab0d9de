//! Application configuration.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! binary). CLI flags override whatever is set here.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TABPREP_DATA_DIR` | Dataset directory | `../data` |
//! | `TABPREP_WRITE_MODE` | `copy` or `in_place` | `copy` |
//! | `TABPREP_DEGENERATE` | `strict` or `lenient` | `strict` |
//! | `TABPREP_DDOF` | Delta degrees of freedom for `std` | `1` |

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::loader::{DataDir, DEFAULT_DATA_DIR};
use crate::transform::{DegeneratePolicy, EngineOptions, WriteMode};

pub const DATA_DIR_VAR: &str = "TABPREP_DATA_DIR";
pub const WRITE_MODE_VAR: &str = "TABPREP_WRITE_MODE";
pub const DEGENERATE_VAR: &str = "TABPREP_DEGENERATE";
pub const DDOF_VAR: &str = "TABPREP_DDOF";

/// Invalid environment value.
#[derive(Error, Debug, PartialEq)]
#[error("Invalid value '{value}' for {var}: expected {expected}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub engine: EngineOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            engine: EngineOptions::default(),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup(WRITE_MODE_VAR) {
            config.engine.write_mode = match value.trim() {
                "copy" => WriteMode::CopyOnWrite,
                "in_place" => WriteMode::InPlace,
                _ => return Err(invalid(WRITE_MODE_VAR, value.clone(), "copy or in_place")),
            };
        }

        if let Some(value) = lookup(DEGENERATE_VAR) {
            config.engine.degenerate = match value.trim() {
                "strict" => DegeneratePolicy::Strict,
                "lenient" => DegeneratePolicy::Lenient,
                _ => return Err(invalid(DEGENERATE_VAR, value.clone(), "strict or lenient")),
            };
        }

        if let Some(value) = lookup(DDOF_VAR) {
            config.engine.ddof = value
                .trim()
                .parse()
                .map_err(|_| invalid(DDOF_VAR, value.clone(), "a small non-negative integer"))?;
        }

        Ok(config)
    }

    pub fn data_dir(&self) -> DataDir {
        DataDir::new(&self.data_dir)
    }
}

fn invalid(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError {
        var,
        value,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_dir, PathBuf::from("../data"));
        assert_eq!(config.engine.write_mode, WriteMode::CopyOnWrite);
        assert_eq!(config.engine.degenerate, DegeneratePolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/data"),
            (WRITE_MODE_VAR, "in_place"),
            (DEGENERATE_VAR, "lenient"),
            (DDOF_VAR, "0"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.engine.write_mode, WriteMode::InPlace);
        assert_eq!(config.engine.degenerate, DegeneratePolicy::Lenient);
        assert_eq!(config.engine.ddof, 0);
    }

    #[test]
    fn test_invalid_value() {
        let err = Config::from_lookup(lookup(&[(DEGENERATE_VAR, "loose")])).unwrap_err();
        assert_eq!(err.var, DEGENERATE_VAR);
        assert!(err.to_string().contains("strict or lenient"));
    }
}
