//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events to stderr)
//!     → tracing.rs (per-connection spans with connection IDs)
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted strings
//! - No metrics: the gateway keeps no cross-request state

pub mod logging;
pub mod tracing;

pub use logging::init_logging;
