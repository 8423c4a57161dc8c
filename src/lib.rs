//! Gemini to HTTP(S) gateway library.

pub mod cli;
pub mod config;
pub mod convert;
pub mod gemini;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;

pub use config::GatewayConfig;
pub use gemini::{GeminiRequest, GeminiResponse, GeminiServer};
pub use lifecycle::Shutdown;
pub use proxy::RequestHandler;
