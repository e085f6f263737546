//! Forwarding errors and their mapping to HTTP responses.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors that end a forwarding cycle without an upstream response.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing or malformed target, or unreadable inbound body.
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream did not answer within the ceiling.
    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// No connection to the upstream within the connect timeout.
    #[error("Upstream connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Connection, protocol or body transfer failure.
    #[error("{0}")]
    NetworkFailure(String),
}

impl ProxyError {
    pub fn missing_param(name: &str) -> Self {
        ProxyError::InvalidInput(format!("Missing {} parameter", name))
    }

    /// Build a network failure carrying the whole source chain.
    pub fn network(err: &(dyn std::error::Error + 'static)) -> Self {
        ProxyError::NetworkFailure(error_chain(err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::Timeout(_) | ProxyError::ConnectTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::NetworkFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
