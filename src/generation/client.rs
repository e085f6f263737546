//! Chat-completions client for the generation backend.
//!
//! # Responsibilities
//! - Send one prompt as a single user message
//! - Bound the call with a deadline
//! - Reduce the backend reply to its generated text
//!
//! # Design Decisions
//! - The API key is optional at construction; its absence surfaces per call
//! - Backend error bodies are summarised, never relayed raw

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::generation::GenerationError;
use crate::proxy::error::error_chain;
use crate::resilience::{Bounded, Deadline};

/// Upper bound on how much of an error body ends up in a message.
const MAX_ERROR_DETAIL: usize = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for the external text-generation API.
#[derive(Debug, Clone)]
pub struct TextGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
    api_key_env: String,
    deadline: Deadline,
    connect_timeout: Duration,
}

impl TextGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout(config))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &GenerationConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            deadline: Deadline::from_secs(config.timeout_secs),
            connect_timeout: connect_timeout(config),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate text for `prompt`. May suspend on the backend call.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::MissingCredential(self.api_key_env.clone()))?;

        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let exchange = async {
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match self.deadline.run(exchange).await {
            Ok(reply) => reply,
            Err(Bounded::Elapsed(limit)) => return Err(GenerationError::Timeout(limit)),
            Err(Bounded::Failed(e)) if e.is_timeout() => {
                return Err(GenerationError::Timeout(self.connect_timeout))
            }
            Err(Bounded::Failed(e)) => return Err(GenerationError::Transport(error_chain(&e))),
        };

        if !status.is_success() {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message: error_detail(&text),
            });
        }

        extract_text(&text)
    }
}

fn connect_timeout(config: &GenerationConfig) -> Duration {
    Duration::from_secs(config.timeout_secs.min(10))
}

/// Pull the generated text out of a chat-completions reply.
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let reply: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let text = reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// `error.message` from a JSON error body, else the truncated raw body.
fn error_detail(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.get("error"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(MAX_ERROR_DETAIL).collect(),
    }
}
