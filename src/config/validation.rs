//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, citation start >= 1)
//! - Require the listener's certificate and key paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.address must not be empty")]
    EmptyAddress,

    #[error("listener.tls.cert_path must be set")]
    MissingCertificate,

    #[error("listener.tls.key_path must be set")]
    MissingKey,

    #[error("listener.max_connections must be greater than zero")]
    NoConnections,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("conversion.citation_start must be at least 1 (got {0})")]
    CitationStart(usize),

    #[error("conversion.link_emit_frequency must be at least 1")]
    LinkEmitFrequency,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = &config.listener;
    if listener.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    }
    if listener.tls.cert_path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingCertificate);
    }
    if listener.tls.key_path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingKey);
    }
    if listener.max_connections == 0 {
        errors.push(ValidationError::NoConnections);
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("download_secs", timeouts.download_secs),
        ("request_read_secs", timeouts.request_read_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    let conversion = &config.conversion;
    if conversion.citation_start < 1 {
        errors.push(ValidationError::CitationStart(conversion.citation_start));
    }
    if conversion.link_emit_frequency < 1 {
        errors.push(ValidationError::LinkEmitFrequency);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.listener.tls.cert_path = "cert.pem".into();
        config.listener.tls.key_path = "key.pem".into();
        config
    }

    #[test]
    fn accepts_defaults_with_tls_paths() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn defaults_without_tls_paths_are_rejected() {
        let errors = validate_config(&GatewayConfig::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingCertificate, ValidationError::MissingKey]
        );
    }

    #[test]
    fn collects_every_error() {
        let mut config = valid();
        config.timeouts.connect_secs = 0;
        config.timeouts.download_secs = 0;
        config.conversion.citation_start = 0;
        config.conversion.link_emit_frequency = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout("connect_secs")));
        assert!(errors.contains(&ValidationError::ZeroTimeout("download_secs")));
        assert!(errors.contains(&ValidationError::CitationStart(0)));
        assert!(errors.contains(&ValidationError::LinkEmitFrequency));
        assert!(errors.contains(&ValidationError::LogLevel("loud".into())));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = valid();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
