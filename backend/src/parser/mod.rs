//! CSV ingestion with encoding and delimiter auto-detection.
//!
//! Turns raw bytes into a [`Table`] of trimmed string cells. No listing logic
//! here: mandatory columns are checked later by the expansion engine.

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{CsvError, CsvResult};
use crate::models::Table;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed sheet
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// How to read an uploaded sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Force a delimiter instead of detecting it.
    pub delimiter: Option<char>,
    /// Whether the first line holds column names. Without it columns are
    /// named `C1`, `C2`, ...
    pub has_header: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
        }
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8. A leading byte-order mark is
/// dropped so it does not end up in the first header.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        // WHATWG maps the latin1 labels to windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        "iso-8859-15" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Product sheets are comma-separated by default.
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
/// Quoted cells may contain delimiters and line breaks. Cells are trimmed,
/// rows made only of blank cells are skipped, short rows are padded.
///
/// # Example
/// ```ignore
/// use listing_maker::parser::parse_str;
///
/// let table = parse_str("SKU,Sizes\nTS-01,\"S, M\"", ',', true).unwrap();
/// assert_eq!(table.cell(0, "Sizes"), Some("S, M"));
/// ```
pub fn parse_str(content: &str, delimiter: char, has_header: bool) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    if !delimiter.is_ascii() {
        return Err(CsvError::parse(1, format!("Unsupported delimiter '{}'", delimiter)));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            CsvError::parse(line, e.to_string())
        })?;

        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(record.iter().map(String::from).collect());
    }

    let mut rows = records.into_iter();
    let headers = if has_header {
        rows.next().ok_or(CsvError::NoHeaders)?
    } else {
        let width = rows.as_slice().iter().map(Vec::len).max().unwrap_or(0);
        (1..=width).map(|i| format!("C{}", i)).collect()
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row);
    }

    Ok(table)
}

/// Parse CSV bytes, detecting encoding and (unless forced) the delimiter.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    // Detect encoding
    let encoding = detect_encoding(bytes);

    // Decode content
    let content = decode_content(bytes, &encoding);

    // Detect delimiter
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(&content));

    let table = parse_str(&content, delimiter, options.has_header)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a CSV file.
///
/// # Example
/// ```ignore
/// let result = parse_file("/path/to/products.csv", &ParseOptions::default())?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Products: {}", result.table.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, options)
}
