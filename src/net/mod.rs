//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → tls.rs (TLS handshake; Gemini is always TLS)
//!     → connection.rs (ID for log correlation)
//!     → Hand off to the Gemini layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - The connection semaphore doubles as the drain barrier on shutdown

pub mod connection;
pub mod listener;
pub mod tls;

pub use connection::ConnectionId;
pub use listener::{ConnectionPermit, Listener, ListenerError};
pub use tls::{load_tls_acceptor, TlsError};
