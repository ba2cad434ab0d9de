//! Dataset loading from a base data directory.
//!
//! A dataset is addressed by its logical name: `housing` resolves to
//! `<data_dir>/housing.csv`, or a spreadsheet with the same stem.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::logs::{log_info, log_success};
use crate::parser::{parse_csv_file_auto, parse_workbook, ExcelOptions};
use crate::table::{BoolVocabulary, Table};

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "../data";

/// Spreadsheet extensions tried by [`DataDir::load_table`], in order
const SPREADSHEET_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "ods"];

/// A directory of datasets plus the parsing settings used to read them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDir {
    pub root: PathBuf,
    /// Explicit CSV delimiter (auto-detect if `None`)
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub vocabulary: BoolVocabulary,
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl DataDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            delimiter: None,
            vocabulary: BoolVocabulary::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: BoolVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Path of `<root>/<name>.<extension>`.
    pub fn path_for(&self, name: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, extension))
    }

    fn not_found(&self, name: &str) -> LoadError {
        LoadError::NotFound {
            name: name.to_string(),
            dir: self.root.clone(),
        }
    }

    /// Load `<root>/<name>.csv`.
    pub fn load_data(&self, name: &str) -> LoadResult<Table> {
        let path = self.path_for(name, "csv");
        if !path.is_file() {
            return Err(self.not_found(name));
        }
        self.read_csv(&path)
    }

    /// Load `<root>/<name>.xlsx`.
    pub fn load_excel(&self, name: &str, options: &ExcelOptions) -> LoadResult<Table> {
        let path = self.path_for(name, "xlsx");
        if !path.is_file() {
            return Err(self.not_found(name));
        }
        self.read_spreadsheet(&path, options)
    }

    /// Load a dataset by name, trying CSV first, then spreadsheets.
    pub fn load_table(&self, name: &str) -> LoadResult<Table> {
        let csv = self.path_for(name, "csv");
        if csv.is_file() {
            return self.read_csv(&csv);
        }

        for ext in SPREADSHEET_EXTENSIONS {
            let path = self.path_for(name, ext);
            if path.is_file() {
                return self.read_spreadsheet(&path, &ExcelOptions::default());
            }
        }

        Err(self.not_found(name))
    }

    /// Dataset names available in the directory, sorted.
    pub fn list(&self) -> LoadResult<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == "csv" || SPREADSHEET_EXTENSIONS.contains(&e))
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn read_csv(&self, path: &Path) -> LoadResult<Table> {
        log_info(format!("📖 Reading {}", path.display()));
        let result = parse_csv_file_auto(path, self.delimiter, &self.vocabulary)?;
        log_success(format!(
            "Encoding: {}, delimiter: '{}', {} rows × {} columns",
            result.encoding,
            format_delimiter(result.delimiter),
            result.table.n_rows(),
            result.table.n_cols()
        ));
        Ok(result.table)
    }

    fn read_spreadsheet(&self, path: &Path, options: &ExcelOptions) -> LoadResult<Table> {
        log_info(format!("📖 Reading {}", path.display()));
        let table = parse_workbook(path, options, &self.vocabulary)?;
        log_success(format!("{} rows × {} columns", table.n_rows(), table.n_cols()));
        Ok(table)
    }
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
