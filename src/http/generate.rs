//! `POST /generate-description`.
//!
//! Always answers 200: `{"description": ...}` on success, `{"error": ...}`
//! otherwise. Existing callers branch on the body, so failures must not turn
//! into HTTP error statuses here.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::generation::{build_prompt, parse_request, GenerationError, TextGenerator};
use crate::http::request::request_id;
use crate::http::response::json_error;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn generate_description(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = request_id(&headers).to_string();
    let outcome = match body {
        Ok(body) => describe(&state.generator, &body, Local::now().date_naive()).await,
        Err(rejection) => Err(GenerationError::InvalidInput(rejection.body_text())),
    };

    match outcome {
        Ok(description) => {
            tracing::info!(request_id = %request_id, chars = description.len(), "Description generated");
            metrics::record_generation("ok");
            (StatusCode::OK, Json(json!({ "description": description }))).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Description generation failed");
            metrics::record_generation(e.label());
            json_error(StatusCode::OK, e.to_string()).into_response()
        }
    }
}

/// Parse, build the prompt and call the backend.
pub async fn describe(
    generator: &TextGenerator,
    body: &[u8],
    today: NaiveDate,
) -> Result<String, GenerationError> {
    let request = parse_request(body)?;
    let prompt = build_prompt(&request, today)?;
    tracing::debug!(player = %request.player.name, prompt_chars = prompt.len(), "Prompt built");
    generator.generate(&prompt).await
}
