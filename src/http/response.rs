//! Small JSON response helpers shared by handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// Liveness payload for `GET /health`.
#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}
