//! Delimited-text and spreadsheet parsing into [`Table`]s.
//!
//! CSV input gets encoding and delimiter auto-detection; column types are
//! inferred from the cell text (see [`crate::table::infer`]).

pub mod excel;

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::table::{infer_column, BoolVocabulary, Table};

pub use excel::{parse_workbook, ExcelOptions};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // UTF-8 and unknown charsets: lossy UTF-8, dropping any BOM
        _ => encoding_rs::UTF_8.decode(bytes).0.into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// The first row is the header; blank header cells are named
/// `Unnamed: <index>`. Blank lines are skipped, short rows are
/// padded with empty cells, and rows with more fields than the header are
/// a parse error.
///
/// # Example
/// ```
/// use tabprep::parser::parse_str;
/// use tabprep::BoolVocabulary;
///
/// let table = parse_str("name;age\nAlice;30\nBob;25", ';', &BoolVocabulary::default()).unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.column("age").unwrap().as_float(), Some(&[30.0, 25.0][..]));
/// ```
pub fn parse_str(content: &str, delimiter: char, vocab: &BoolVocabulary) -> LoadResult<Table> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| LoadError::parse(1, format!("Delimiter '{}' is not a single byte", delimiter)))?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let raw_headers = rdr.headers()?.clone();
    if raw_headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }
    let headers: Vec<String> = raw_headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for record in rdr.records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(LoadError::parse(
                line,
                format!("Expected {} fields, found {}", headers.len(), record.len()),
            ));
        }

        for (i, column) in cells.iter_mut().enumerate() {
            let value = record.get(i).filter(|v| !v.is_empty()).map(str::to_string);
            column.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values, vocab))
        .collect();

    Ok(Table::from_columns(columns)?)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>, vocab: &BoolVocabulary) -> LoadResult<ParseResult> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_str(&content, delimiter, vocab)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("/path/to/file.csv", None, &BoolVocabulary::default())?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.table.n_rows());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(
    path: P,
    delimiter: Option<char>,
    vocab: &BoolVocabulary,
) -> LoadResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, delimiter, vocab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnData, DType};

    fn vocab() -> BoolVocabulary {
        BoolVocabulary::default()
    }

    #[test]
    fn test_simple_csv() {
        let table = parse_str("name;age\nAlice;30\nBob;25", ';', &vocab()).unwrap();

        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.column("name").unwrap().dtype(), DType::Text);
        assert_eq!(table.column("age").unwrap().as_float(), Some(&[30.0, 25.0][..]));
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,value\n\"Doe, Jane\",\"1.5\"";
        let table = parse_str(csv, ',', &vocab()).unwrap();

        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Text(vec![Some("Doe, Jane".to_string())])
        );
        assert_eq!(table.column("value").unwrap().as_float(), Some(&[1.5][..]));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_str("a;b\n1;2\n\n3;4\n", ';', &vocab()).unwrap();
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_missing_values() {
        let table = parse_str("a;b;c\n1;;3\n4;5", ';', &vocab()).unwrap();

        let b = table.column("b").unwrap().as_float().unwrap();
        assert!(b[0].is_nan());
        assert_eq!(b[1], 5.0);
        assert!(table.column("c").unwrap().as_float().unwrap()[1].is_nan());
    }

    #[test]
    fn test_extra_fields_rejected() {
        let err = parse_str("a;b\n1;2\n1;2;3", ';', &vocab()).unwrap_err();
        match err {
            LoadError::ParseError { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Expected 2 fields"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_boolean_columns() {
        let table = parse_str("id,furnished\n1,Yes\n2,No\n3,", ',', &vocab()).unwrap();
        assert_eq!(
            table.column("furnished").unwrap().data,
            ColumnData::Bool(vec![Some(true), Some(false), None])
        );
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = parse_str("a,a\n1,2", ',', &vocab()).unwrap_err();
        assert!(matches!(err, LoadError::Table(_)));
    }

    #[test]
    fn test_blank_headers_named() {
        let table = parse_str("a,b,,\n1,2,,\n3,4,,\n", ',', &vocab()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["a", "b", "Unnamed: 2", "Unnamed: 3"]
        );
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("b").unwrap().as_float(), Some(&[2.0, 4.0][..]));
        assert!(table.column("Unnamed: 3").unwrap().as_float().unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ';', &vocab()), Err(LoadError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b"", None, &vocab()), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_header_only() {
        let table = parse_str("a,b\n", ',', &vocab()).unwrap();
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.n_rows(), 0);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name;age\nAlice;30\nBob;25", None, &vocab()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.n_rows(), 2);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }
}
