//! Error types for the listing expansion pipeline.
//!
//! This module defines one error type per layer:
//!
//! - [`CsvError`] - CSV ingestion errors (encoding, delimiter, malformed rows)
//! - [`ExpandError`] - Row expansion errors (schema validation)
//! - [`ExportError`] - CSV output errors
//! - [`ConfigError`] - Environment configuration errors
//! - [`ChannelError`] - Unknown sales channel names
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Ingestion Errors
// =============================================================================

/// Errors while reading an uploaded product sheet.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid CSV format, with the 1-based line it was found on.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl CsvError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Expansion Errors
// =============================================================================

/// Errors from the row expansion engine.
///
/// Only header validation can fail; soft conditions (blank variations,
/// missing name/category for descriptions) are handled in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A mandatory column is absent from the header row.
    #[error("Missing mandatory column: '{0}'")]
    MissingColumn(String),

    /// A pass-through column already carries the name the variations
    /// column is renamed to.
    #[error("Column '{0}' clashes with the generated size column")]
    HeaderConflict(String),

    /// The schema does not describe one of the roles the engine needs.
    #[error("Schema has no column for {0}")]
    IncompleteSchema(&'static str),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the expanded listing sheet.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// IO failure.
    #[error("Failed to write file: {0}")]
    IoError(#[from] std::io::Error),

    /// Writer produced non UTF-8 output.
    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Writer could not be flushed into its buffer.
    #[error("Failed to finalize CSV buffer: {0}")]
    Finalize(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable set but not parseable.
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

// =============================================================================
// Channel Errors
// =============================================================================

/// Unknown marketplace name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown sales channel: '{0}'")]
pub struct ChannelError(pub String);

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::expand_file`].
/// It wraps all lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV ingestion error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Expansion error.
    #[error("Expand error: {0}")]
    Expand(#[from] ExpandError),

    /// Output error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Channel selection error.
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// No data rows in the sheet.
    #[error("No product rows to expand")]
    EmptyInput,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Socket or runtime failure.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for expansion operations.
pub type ExpandResult<T> = Result<T, ExpandError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // ExpandError -> PipelineError
        let expand_err = ExpandError::MissingColumn("Group Name*".into());
        let pipeline_err: PipelineError = expand_err.into();
        assert!(pipeline_err.to_string().contains("Group Name*"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = CsvError::parse(5, "unterminated quote");
        let msg = err.to_string();
        assert!(msg.contains("line 5"));
        assert!(msg.contains("unterminated quote"));
    }

    #[test]
    fn test_channel_error_names_channel() {
        let err: PipelineError = ChannelError("Etsy".into()).into();
        assert!(err.to_string().contains("Etsy"));
    }
}
