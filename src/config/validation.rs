//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and upstream URLs
//! - Validate value ranges (timeouts > 0, token budget > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be > 0"));
    }

    if let Err(message) = check_http_url(&config.forwarder.base_url) {
        errors.push(ValidationError::new("forwarder.base_url", message));
    }

    let prefix = &config.forwarder.strip_prefix;
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::new(
            "forwarder.strip_prefix",
            "must be empty or start with '/'",
        ));
    }

    if config.forwarder.timeout_secs == 0 {
        errors.push(ValidationError::new("forwarder.timeout_secs", "must be > 0"));
    }

    if config.forwarder.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "forwarder.connect_timeout_secs",
            "must be > 0",
        ));
    }

    if axum::http::HeaderName::from_bytes(config.forwarder.auth_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "forwarder.auth_header",
            format!("'{}' is not a valid header name", config.forwarder.auth_header),
        ));
    }

    if let Err(message) = check_http_url(&config.generation.endpoint) {
        errors.push(ValidationError::new("generation.endpoint", message));
    }

    if config.generation.max_tokens == 0 {
        errors.push(ValidationError::new("generation.max_tokens", "must be > 0"));
    }

    if config.generation.timeout_secs == 0 {
        errors.push(ValidationError::new("generation.timeout_secs", "must be > 0"));
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "'{}' is not one of {:?}",
                config.observability.log_level, LOG_LEVELS
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| format!("'{}' is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
