//! Markup conversion subsystem.
//!
//! # Data Flow
//! ```text
//! HTML text
//!     → gemtext.rs (parse with html5ever, walk the DOM)
//!     → table.rs (tables as rows or aligned grids)
//!     → gemtext text
//! ```
//!
//! The gateway only depends on [`MarkupConverter`], so the conversion can
//! be swapped without touching the request pipeline.

pub mod gemtext;
pub mod options;
pub mod table;

use thiserror::Error;

pub use gemtext::GemtextConverter;
pub use options::{ConversionOptions, TableStyle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("document nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Turns an HTML document into gemtext.
///
/// Conversion is synchronous CPU work. It either yields the whole document
/// or fails; there is no partial output.
pub trait MarkupConverter: Send + Sync {
    fn convert(&self, html: &str, options: &ConversionOptions) -> Result<String, ConversionError>;
}
