//! # Listing Maker - product sheets to per-SKU marketplace listings
//!
//! Listing Maker takes a flat product sheet (one row per product, sizes as a
//! comma-separated list) and produces one listing row per size, with composite
//! SKU codes, generated descriptions where missing, and a fixed column layout.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Expand    │────▶│ Listing CSV │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (SKU × size)│     │ (per SKU)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing_maker::{expand_file, ExpandOptions, ListingSchema};
//! use std::path::Path;
//!
//! let schema = ListingSchema::marketplace();
//! let result = expand_file(Path::new("products.csv"), &schema, &ExpandOptions::default()).unwrap();
//! println!("Generated {} listings", result.outcome.output_rows());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment configuration
//! - [`models`] - Schema, table and channel models
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Expansion engine, description template, pipeline
//! - [`export`] - CSV output and sample template
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ChannelError, ConfigError, CsvError, ExpandError, ExportError, PipelineError, ServerError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Channel, ChannelCategory, FieldRole, FieldSpec, ListingSchema, Table};

// =============================================================================
// Re-exports - Core
// =============================================================================

pub use transform::description::{synthesize, ProductAttributes, FALLBACK_DESCRIPTION};
pub use transform::expand::{
    composite_sku, expand, normalize_color, normalize_variations, ExpandOutcome, SIZE_HEADER,
    SKU_SEPARATOR,
};

// =============================================================================
// Re-exports - Parsing and export
// =============================================================================

pub use export::{sample_csv, sample_table, write_csv, write_csv_file};
pub use parser::{parse_bytes, parse_file, parse_str, ParseOptions, ParseResult};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    expand_bytes, expand_file, expand_table, CsvInfo, ExpandOptions, ListingResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{load_app_config, AppConfig};

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server, AppState};
}
