//! Scouting-description generation.
//!
//! # Data Flow
//! ```text
//! POST /generate-description {player, careerEntries}
//!     → prompt.rs (age, position label, stats.rs totals and flags → prompt text)
//!     → client.rs (single user message to the chat-completions backend)
//!     → {"description": text} | {"error": message}, always status 200
//! ```
//!
//! # Design Decisions
//! - Callers inspect the body, not the status: every failure is a 200 with an
//!   `error` field, matching what existing clients expect
//! - The API key is injected at construction and checked on first use

pub mod client;
pub mod position;
pub mod prompt;
pub mod stats;

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use client::TextGenerator;
pub use prompt::build_prompt;
pub use stats::{aggregate, CareerTotals};

/// Body of `POST /generate-description`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    pub player: PlayerRecord,
    #[serde(default)]
    pub career_entries: Vec<CareerEntry>,
}

/// The subject of the description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(default)]
    pub name: String,
    pub position: Option<String>,
    #[serde(default)]
    pub age: Value,
    pub birth_date: Option<String>,
    #[serde(default)]
    pub height: Value,
    pub foot: Option<String>,
    pub nationality: Option<String>,
    pub current_club: Option<String>,
    /// Free text, or a list of short strengths.
    #[serde(default)]
    pub strengths: Value,
}

/// One season or spell in the career history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEntry {
    pub season: Option<String>,
    pub club: Option<String>,
    #[serde(alias = "competition")]
    pub league: Option<String>,
    #[serde(default)]
    pub games: Value,
    #[serde(default)]
    pub goals: Value,
    #[serde(default)]
    pub assists: Value,
}

impl CareerEntry {
    /// Club and competition names, for keyword matching.
    pub fn names(&self) -> Vec<&str> {
        [self.club.as_deref(), self.league.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Why a description could not be produced.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation is not configured: {0} is not set")]
    MissingCredential(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Generation backend returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Generation backend returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Generation backend returned no text")]
    EmptyResponse,

    #[error("Generation backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("Generation backend unreachable: {0}")]
    Transport(String),
}

impl GenerationError {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential(_) => "missing_credential",
            GenerationError::InvalidInput(_) => "invalid_input",
            GenerationError::Upstream { .. } => "upstream",
            GenerationError::InvalidResponse(_) => "invalid_response",
            GenerationError::EmptyResponse => "empty",
            GenerationError::Timeout(_) => "timeout",
            GenerationError::Transport(_) => "transport",
        }
    }
}

/// Parse a raw request body.
pub fn parse_request(body: &[u8]) -> Result<DescriptionRequest, GenerationError> {
    serde_json::from_slice(body).map_err(|e| GenerationError::InvalidInput(e.to_string()))
}
