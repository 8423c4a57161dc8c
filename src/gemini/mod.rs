//! Gemini protocol subsystem.
//!
//! # Data Flow
//! ```text
//! TLS stream
//!     → request.rs (one CRLF-terminated absolute URL)
//!     → proxy::RequestHandler
//!     → response.rs (`<status> <meta>\r\n` + body on 20)
//!     → server.rs writes it and closes the connection
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{GeminiRequest, RequestError};
pub use response::{Body, GeminiResponse, Status, StatusCategory, GEMTEXT_MIME};
pub use server::{serve_connection, ConnectionError, GeminiServer};
