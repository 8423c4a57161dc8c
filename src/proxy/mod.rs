//! Request-handling pipeline.
//!
//! # Data Flow
//! ```text
//! GeminiRequest
//!     → handler.rs (scheme check, orchestration)
//!     → fetcher.rs (bounded GET, redirect detection, body read)
//!     → transform.rs (pass-through or HTML → gemtext + footer)
//!     → mapper.rs (outcome → Gemini status and meta)
//!     → GeminiResponse
//! ```
//!
//! # Design Decisions
//! - Every failure is request-scoped and becomes a response; none escape
//! - No caching, no retries, no state shared between requests beyond the
//!   immutable configuration

pub mod error;
pub mod fetcher;
pub mod handler;
pub mod mapper;
pub mod transform;

pub use error::GatewayError;
pub use fetcher::{FetchError, FetchResult, FetchSettings, HttpFetcher};
pub use handler::{ProxyRequest, RequestHandler};
pub use transform::{ContentTransformer, Transformed};
