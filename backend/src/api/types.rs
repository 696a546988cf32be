//! REST API types for frontend integration.

use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ExpandError, PipelineError};
use crate::models::{ChannelCategory, Table};
use crate::transform::pipeline::ListingResult;

/// Response sent after a product sheet was expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready", or "warning" when some products had no sizes
    pub status: String,

    /// Suggested download name
    pub file_name: String,

    /// Full expanded sheet as CSV text
    pub csv: String,

    /// First expanded rows for display
    pub preview: PreviewTable,

    pub metadata: ResponseMetadata,
}

/// Headers plus rows, in column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl From<Table> for PreviewTable {
    fn from(table: Table) -> Self {
        Self {
            headers: table.headers,
            rows: table.rows,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Product rows uploaded
    pub input_rows: usize,
    /// Listing rows generated
    pub output_rows: usize,
    /// 1-based rows dropped for blank size lists
    pub excluded_rows: Vec<usize>,
    /// Descriptions filled in by the template
    pub descriptions_generated: usize,
    pub channels: Vec<String>,
    pub csv_info: CsvMetadata,
    pub generated_at: String,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl From<ListingResult> for ExpandResponse {
    fn from(result: ListingResult) -> Self {
        let outcome = result.outcome;

        ExpandResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if outcome.excluded_rows.is_empty() { "ready" } else { "warning" }.to_string(),
            file_name: result.file_name,
            csv: result.csv,
            preview: result.preview.into(),
            metadata: ResponseMetadata {
                input_rows: outcome.input_rows,
                output_rows: outcome.table.len(),
                excluded_rows: outcome.excluded_rows,
                descriptions_generated: outcome.descriptions_generated,
                channels: result.channels.iter().map(|c| c.name.to_string()).collect(),
                csv_info: CsvMetadata {
                    encoding: result.csv_info.encoding,
                    delimiter: result.csv_info.delimiter.to_string(),
                    row_count: result.csv_info.row_count,
                    columns: result.csv_info.headers,
                },
                generated_at: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Channel catalogue grouped by category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelGroup {
    pub category: String,
    pub channels: Vec<&'static str>,
}

pub fn channel_catalogue() -> Vec<ChannelGroup> {
    [ChannelCategory::Ecommerce, ChannelCategory::QuickCommerce]
        .iter()
        .map(|category| ChannelGroup {
            category: category.label().to_string(),
            channels: category.channels().map(|c| c.name).collect(),
        })
        .collect()
}

/// HTTP status for a failed pipeline run.
pub fn pipeline_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Expand(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Csv(_) | PipelineError::Channel(_) | PipelineError::EmptyInput => {
            StatusCode::BAD_REQUEST
        }
        PipelineError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "missingColumn": null,
    })
}

/// Error response for a failed pipeline run, naming the missing column when
/// that is the cause.
pub fn pipeline_error_response(err: &PipelineError) -> Value {
    let mut body = error_response(&err.to_string());
    if let PipelineError::Expand(ExpandError::MissingColumn(column)) = err {
        body["missingColumn"] = json!(column);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;

    #[test]
    fn test_status_mapping() {
        let missing = PipelineError::Expand(ExpandError::MissingColumn("Group Name*".into()));
        assert_eq!(pipeline_status(&missing), StatusCode::UNPROCESSABLE_ENTITY);
        let clash = PipelineError::Expand(ExpandError::HeaderConflict("Size".into()));
        assert_eq!(pipeline_status(&clash), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            pipeline_status(&PipelineError::Csv(CsvError::EmptyFile)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(pipeline_status(&PipelineError::EmptyInput), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_column_in_error_body() {
        let err = PipelineError::Expand(ExpandError::MissingColumn("Group Name*".into()));
        let body = pipeline_error_response(&err);
        assert_eq!(body["status"], "error");
        assert_eq!(body["missingColumn"], "Group Name*");
        assert!(body["error"].as_str().unwrap().contains("Group Name*"));
    }

    #[test]
    fn test_channel_catalogue() {
        let groups = channel_catalogue();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Ecommerce");
        assert_eq!(groups[1].channels[0], "Blinkit");
    }
}
