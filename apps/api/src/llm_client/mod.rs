//! LLM client: the single point of entry for all model-provider calls.
//!
//! No other module may call the provider API directly. Callers go through
//! `gateway::TextGateway`, which sequences a ranked model list over a
//! `CompletionBackend`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod gateway;
pub mod parse;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Classified failure of a single completion call against one model.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The model identifier is unknown or no longer served.
    #[error("model not found: {0}")]
    NotFound(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Provider overloaded or returning 5xx.
    #[error("service unavailable (status {status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    /// Credential rejected. Every candidate shares the key, so this is never
    /// worth retrying on another model.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::NotFound(_) => "not_found",
            CompletionError::RateLimited(_) => "rate_limited",
            CompletionError::ServiceUnavailable { .. } => "service_unavailable",
            CompletionError::Unauthorized(_) => "unauthorized",
            CompletionError::Other(_) => "other",
        }
    }

    /// Maps a provider HTTP status onto a failure class.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            404 => CompletionError::NotFound(message),
            429 => CompletionError::RateLimited(message),
            401 | 403 => CompletionError::Unauthorized(message),
            // 529 is the provider's "overloaded" status
            503 | 529 => CompletionError::ServiceUnavailable {
                status: status.as_u16(),
                message,
            },
            s if (500..600).contains(&s) => CompletionError::ServiceUnavailable { status: s, message },
            _ => CompletionError::Other(format!("status {}: {message}", status.as_u16())),
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => CompletionError::from_status(status, e.to_string()),
            None => CompletionError::Other(format!("HTTP error: {e}")),
        }
    }
}

/// An opaque text-completion capability addressed by model identifier.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API backend. Makes exactly one request per call;
/// sequencing and backoff belong to the gateway.
#[derive(Clone)]
pub struct AnthropicBackend {
    client: Client,
    api_key: String,
}

impl AnthropicBackend {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        let request_body = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::from_status(status, message));
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call to {} succeeded: input_tokens={}, output_tokens={}",
            model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response
            .text()
            .map(str::to_string)
            .ok_or_else(|| CompletionError::Other("LLM returned empty content".to_string()))
    }
}
