//! Transformation module.
//!
//! This module handles product sheet to listing expansion:
//! - Expand: Row explosion, composite SKUs, sorting and column layout
//! - Description: Template text for blank descriptions
//! - Pipeline: Parse, expand and export in one call

pub mod description;
pub mod expand;
pub mod pipeline;

pub use description::{synthesize, ProductAttributes};
pub use expand::{expand, ExpandOutcome};
pub use pipeline::*;
