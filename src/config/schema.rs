//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gemini listener (bind address, port, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Outbound HTTP settings.
    pub http: HttpConfig,

    /// HTML to gemtext conversion settings.
    pub conversion: ConversionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (IP or hostname).
    pub address: String,

    /// Bind port. Gemini's registered port is 1965.
    pub port: u16,

    /// Server certificate and key.
    pub tls: TlsConfig,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 1965,
            tls: TlsConfig::default(),
            max_connections: 1024,
        }
    }
}

impl ListenerConfig {
    /// `address:port` in the form accepted by `TcpListener::bind`.
    pub fn bind_target(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate chain file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream socket connect + TLS handshake timeout in seconds.
    pub connect_secs: u64,

    /// Upstream request/response/body timeout in seconds.
    pub download_secs: u64,

    /// Time allowed for a Gemini client to finish the handshake and send
    /// its request line, in seconds.
    pub request_read_secs: u64,

    /// How long shutdown waits for in-flight connections, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            download_secs: 10,
            request_read_secs: 10,
            shutdown_grace_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn download(&self) -> Duration {
        Duration::from_secs(self.download_secs)
    }

    pub fn request_read(&self) -> Duration {
        Duration::from_secs(self.request_read_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Outbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HttpConfig {
    /// `User-Agent` sent upstream. Empty means the header is not set.
    pub user_agent: String,
}

/// HTML to gemtext conversion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Pass every response through untouched, HTML included.
    pub unfiltered: bool,

    /// Render tables as aligned grids. Works with most simple tables.
    pub pretty_tables: bool,

    /// First citation number.
    pub citation_start: usize,

    /// Footnote-style `[n]` markers after link text.
    pub citation_markers: bool,

    /// Number the emitted link lines.
    pub numbered_links: bool,

    /// Emit links to embedded images.
    pub emit_images_as_links: bool,

    /// Emit gathered links after this many paragraphs.
    pub link_emit_frequency: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            unfiltered: false,
            pretty_tables: false,
            citation_start: 1,
            citation_markers: false,
            numbered_links: false,
            emit_images_as_links: false,
            link_emit_frequency: 2,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for terminals.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
