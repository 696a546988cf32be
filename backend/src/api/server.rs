//! HTTP Server for the listing maker API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/expand`     | Upload a product sheet for expansion |
//! | GET    | `/api/template`   | Sample product sheet (CSV)           |
//! | GET    | `/api/channels`   | Sales channel catalogue              |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{
    channel_catalogue, error_response, pipeline_error_response, pipeline_status, ExpandResponse,
};
use crate::config::AppConfig;
use crate::error::ServerResult;
use crate::export::sample_csv;
use crate::models::ListingSchema;
use crate::parser::ParseOptions;
use crate::transform::pipeline::{expand_bytes, ExpandOptions};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub schema: Arc<ListingSchema>,
}

impl AppState {
    pub fn new(config: AppConfig, schema: ListingSchema) -> Self {
        Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl AsRef<str>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(message.as_ref())))
}

/// Build the router; split from [`start_server`] so tests can drive it
/// without a socket.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/expand", post(expand_upload))
        .route("/api/template", get(template))
        .route("/api/channels", get(channels))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: AppState) -> ServerResult<()> {
    let port = state.config.port;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Listing maker running on http://localhost:{}", port);
    println!("   POST /api/expand   - Upload product sheet");
    println!("   GET  /api/template - Sample sheet");
    println!("   GET  /api/channels - Sales channels");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "listing-maker",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "expand": "POST /api/expand",
            "template": "GET /api/template",
            "channels": "GET /api/channels",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Sample sheet download
async fn template(State(state): State<AppState>) -> Result<Response, ApiError> {
    let csv = sample_csv(&state.schema).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"listing_template.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn channels() -> Json<Value> {
    Json(json!({ "groups": channel_catalogue() }))
}

/// Product sheet upload.
///
/// Multipart fields: `file` (required), `channel` (repeatable) and
/// `noHeader` (`true` when the sheet has no header row).
async fn expand_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExpandResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut channels: Vec<String> = Vec::new();
    let mut has_header = true;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "channel" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                if !value.trim().is_empty() {
                    channels.push(value);
                }
            }
            "noHeader" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                has_header = !value.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| bad_request("No file provided"))?;

    if let Some(name) = file_name.as_deref() {
        if !name.to_lowercase().ends_with(".csv") {
            return Err(bad_request(format!("Unsupported file type: {}", name)));
        }
    }

    println!("\n{}", "=".repeat(70));
    println!(
        "📄 NEW UPLOAD: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );
    println!("{}\n", "=".repeat(70));

    let options = ExpandOptions {
        parse: ParseOptions {
            delimiter: None,
            has_header,
        },
        channels,
        default_channel: state.config.default_channel,
        preview_rows: state.config.preview_rows,
    };

    let result = expand_bytes(&bytes, &state.schema, &options).map_err(|e| {
        log_error(e.to_string());
        (pipeline_status(&e), Json(pipeline_error_response(&e)))
    })?;

    Ok(Json(ExpandResponse::from(result)))
}
