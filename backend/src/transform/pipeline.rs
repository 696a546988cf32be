//! High-level pipeline API: product sheet in, listing CSV out.
//!
//! This module combines parsing, expansion and export, and logs each step
//! through the log broadcaster.
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_maker::{expand_file, ExpandOptions, ListingSchema};
//! use std::path::Path;
//!
//! let result = expand_file(
//!     Path::new("products.csv"),
//!     &ListingSchema::marketplace(),
//!     &ExpandOptions::default(),
//! )?;
//! println!("{} listings -> {}", result.outcome.output_rows(), result.file_name);
//! ```

use std::path::Path;

use serde::Serialize;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::config::DEFAULT_PREVIEW_ROWS;
use crate::error::{PipelineError, PipelineResult};
use crate::export::write_csv;
use crate::models::channel::{listing_file_name, Channel, CHANNELS};
use crate::models::{ListingSchema, Table};
use crate::parser::{parse_bytes, parse_file, ParseOptions, ParseResult};

use super::expand::{expand, ExpandOutcome};

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// How to read the uploaded sheet
    pub parse: ParseOptions,
    /// Selected sales channels (names, case-insensitive)
    pub channels: Vec<String>,
    /// Channel used for the file name when `channels` is empty
    pub default_channel: &'static Channel,
    /// Number of expanded rows kept for display
    pub preview_rows: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            channels: Vec::new(),
            default_channel: &CHANNELS[0],
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct ListingResult {
    /// Expanded table and row counts
    pub outcome: ExpandOutcome,
    /// Expanded table rendered as CSV
    pub csv: String,
    /// Suggested download name
    pub file_name: String,
    /// Channels the listings were generated for
    pub channels: Vec<&'static Channel>,
    /// First rows of the expanded table
    pub preview: Table,
    /// Input parsing metadata
    pub csv_info: CsvInfo,
}

/// Expand a product sheet file.
pub fn expand_file(
    path: &Path,
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> PipelineResult<ListingResult> {
    log_info(format!("📖 Reading {}", path.display()));
    let parsed = parse_file(path, &options.parse)?;
    expand_parsed(parsed, schema, options)
}

/// Expand an uploaded product sheet.
pub fn expand_bytes(
    bytes: &[u8],
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> PipelineResult<ListingResult> {
    log_info(format!("📖 Reading upload ({} bytes)", bytes.len()));
    let parsed = parse_bytes(bytes, &options.parse)?;
    expand_parsed(parsed, schema, options)
}

/// Expand an already-parsed table.
pub fn expand_table(
    table: Table,
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> PipelineResult<ListingResult> {
    let parsed = ParseResult {
        table,
        encoding: "utf-8".to_string(),
        delimiter: ',',
    };
    expand_parsed(parsed, schema, options)
}

fn expand_parsed(
    parsed: ParseResult,
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> PipelineResult<ListingResult> {
    // Resolve channels before any work so a typo fails fast
    let channels = if options.channels.is_empty() {
        vec![options.default_channel]
    } else {
        Channel::parse_all(&options.channels)?
    };

    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("{} base products found", parsed.table.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        headers: parsed.table.headers.clone(),
        row_count: parsed.table.len(),
    };

    // Headers are validated even when there are no rows to expand
    let outcome = expand(&parsed.table, schema)?;
    if outcome.input_rows == 0 {
        return Err(PipelineError::EmptyInput);
    }
    log_info("⚙️  Expanded size variations");

    if outcome.descriptions_generated > 0 {
        log_info(format!(
            "Generated {} missing description(s)",
            outcome.descriptions_generated
        ));
    }
    if !outcome.excluded_rows.is_empty() {
        log_warning(format!(
            "{} product(s) skipped, no sizes listed (rows: {})",
            outcome.excluded_count(),
            format_rows(&outcome.excluded_rows)
        ));
    }
    log_success(format!(
        "Total SKU-level listings generated: {}",
        outcome.output_rows()
    ));

    let csv = write_csv(&outcome.table)?;
    let file_name = listing_file_name(&channels);
    let preview = outcome.table.head(options.preview_rows);

    Ok(ListingResult {
        outcome,
        csv,
        file_name,
        channels,
        preview,
        csv_info,
    })
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// `1, 4, 9` with at most five numbers shown.
fn format_rows(rows: &[usize]) -> String {
    let sample: Vec<String> = rows.iter().take(5).map(|r| r.to_string()).collect();
    if rows.len() > 5 {
        format!("{}... +{}", sample.join(", "), rows.len() - 5)
    } else {
        sample.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpandError;
    use crate::export::sample_table;

    #[test]
    fn test_default_options() {
        let opts = ExpandOptions::default();
        assert!(opts.parse.has_header);
        assert!(opts.channels.is_empty());
        assert_eq!(opts.default_channel.name, "Amazon");
        assert_eq!(opts.preview_rows, 10);
    }

    #[test]
    fn test_expand_sample_table() {
        let schema = ListingSchema::marketplace();
        let result =
            expand_table(sample_table(&schema), &schema, &ExpandOptions::default()).unwrap();

        assert_eq!(result.outcome.output_rows(), 4);
        assert_eq!(result.file_name, "SKU_Listings_for_Amazon.csv");
        assert!(result.csv.starts_with("SKU Code*,Size,Product Color*,Product Name*"));
        assert!(result.csv.contains("TS-01--RED--XL"));
    }

    #[test]
    fn test_channels_name_file() {
        let schema = ListingSchema::marketplace();
        let options = ExpandOptions {
            channels: vec!["flipkart".into(), "Blinkit".into()],
            ..ExpandOptions::default()
        };
        let result = expand_table(sample_table(&schema), &schema, &options).unwrap();
        assert_eq!(result.file_name, "SKU_Listings_for_Flipkart_Blinkit.csv");
        assert_eq!(result.channels.len(), 2);
    }

    #[test]
    fn test_unknown_channel() {
        let schema = ListingSchema::marketplace();
        let options = ExpandOptions {
            channels: vec!["Etsy".into()],
            ..ExpandOptions::default()
        };
        let err = expand_table(sample_table(&schema), &schema, &options).unwrap_err();
        assert!(matches!(err, PipelineError::Channel(_)));
    }

    #[test]
    fn test_preview_limited() {
        let schema = ListingSchema::marketplace();
        let options = ExpandOptions {
            preview_rows: 2,
            ..ExpandOptions::default()
        };
        let result = expand_table(sample_table(&schema), &schema, &options).unwrap();
        assert_eq!(result.preview.len(), 2);
        assert_eq!(result.outcome.output_rows(), 4);
    }

    #[test]
    fn test_empty_input() {
        let schema = ListingSchema::marketplace();
        let table = Table::new(schema.headers());
        let err = expand_table(table, &schema, &ExpandOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn test_header_only_sheet_reports_missing_column() {
        let schema = ListingSchema::marketplace();
        let headers: Vec<String> = schema
            .headers()
            .into_iter()
            .filter(|h| h != "Group Name*")
            .collect();
        let err = expand_table(Table::new(headers), &schema, &ExpandOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Expand(ExpandError::MissingColumn(ref c)) if c == "Group Name*"
        ));
    }

    #[test]
    fn test_missing_column_from_bytes() {
        let schema = ListingSchema::marketplace();
        let err = expand_bytes(b"SKU Code*,Size\nTS-01,M", &schema, &ExpandOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Expand(ExpandError::MissingColumn(ref c)) if c == "Product Name*"
        ));
    }

    #[test]
    fn test_headerless_upload_fails_validation() {
        let schema = ListingSchema::marketplace();
        let options = ExpandOptions {
            parse: ParseOptions {
                delimiter: None,
                has_header: false,
            },
            ..ExpandOptions::default()
        };
        let err = expand_bytes(b"Tee,S,Red", &schema, &options).unwrap_err();
        assert!(matches!(err, PipelineError::Expand(ExpandError::MissingColumn(_))));
    }

    #[test]
    fn test_format_rows() {
        assert_eq!(format_rows(&[1, 4]), "1, 4");
        assert_eq!(format_rows(&[1, 2, 3, 4, 5, 6, 7]), "1, 2, 3, 4, 5... +2");
    }
}
