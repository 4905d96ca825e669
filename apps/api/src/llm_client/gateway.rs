//! Text generation gateway: walks a ranked model list until one succeeds.
//!
//! First success wins; earlier models are preferred. Each failed attempt is
//! classified into an `AttemptOutcome` and the loop acts on the tag alone.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{CompletionBackend, CompletionError};

/// Explicit provider configuration, built once at startup and validated
/// before the gateway is constructed.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub models: Vec<String>,
    pub rate_limit_backoff: Duration,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), GatewayConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(GatewayConfigError::MissingApiKey);
        }
        if self.models.is_empty() {
            return Err(GatewayConfigError::NoModels);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GatewayConfigError {
    #[error("provider API key is empty")]
    MissingApiKey,
    #[error("model list is empty")]
    NoModels,
}

/// Result of one candidate attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(String),
    /// Rate limited: wait, then move on to the next candidate.
    Retryable(CompletionError),
    /// Model unavailable or any unclassified failure: move on immediately.
    Skip(CompletionError),
    /// No candidate can succeed; stop the walk.
    Fatal(CompletionError),
}

impl AttemptOutcome {
    fn classify(result: Result<String, CompletionError>) -> Self {
        match result {
            Ok(text) => AttemptOutcome::Success(text.trim().to_string()),
            Err(e @ CompletionError::RateLimited(_)) => AttemptOutcome::Retryable(e),
            Err(e @ CompletionError::Unauthorized(_)) => AttemptOutcome::Fatal(e),
            Err(e) => AttemptOutcome::Skip(e),
        }
    }
}

/// A failed candidate, kept for diagnostics and retry decisions.
#[derive(Debug)]
pub struct ModelFailure {
    pub model: String,
    pub error: CompletionError,
}

/// Every candidate failed, or one failed fatally.
#[derive(Debug, Error)]
#[error("generation failed after {} model attempt(s): {}", .failures.len(), describe(.failures))]
pub struct GenerationFailed {
    pub failures: Vec<ModelFailure>,
    pub aborted: bool,
}

fn describe(failures: &[ModelFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}={}", f.model, f.error.kind()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl GenerationFailed {
    /// True when the last candidate tried reported the provider as unavailable.
    /// The orchestrator retries the whole walk only in this case.
    pub fn is_service_unavailable(&self) -> bool {
        !self.aborted
            && matches!(
                self.failures.last().map(|f| &f.error),
                Some(CompletionError::ServiceUnavailable { .. })
            )
    }
}

#[derive(Clone)]
pub struct TextGateway {
    backend: Arc<dyn CompletionBackend>,
    models: Vec<String>,
    rate_limit_backoff: Duration,
}

impl TextGateway {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        config: &GatewayConfig,
    ) -> Result<Self, GatewayConfigError> {
        config.validate()?;
        Ok(Self {
            backend,
            models: config.models.clone(),
            rate_limit_backoff: config.rate_limit_backoff,
        })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Returns the trimmed text of the first model that answers.
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationFailed> {
        let mut failures = Vec::new();

        for (idx, model) in self.models.iter().enumerate() {
            let has_next = idx + 1 < self.models.len();
            let result = self.backend.complete(model, system, prompt).await;

            match AttemptOutcome::classify(result) {
                AttemptOutcome::Success(text) => {
                    info!("Generation succeeded with model {model}");
                    return Ok(text);
                }
                AttemptOutcome::Retryable(error) => {
                    warn!(
                        "Model {model} rate limited; waiting {}ms before next candidate",
                        self.rate_limit_backoff.as_millis()
                    );
                    failures.push(ModelFailure {
                        model: model.clone(),
                        error,
                    });
                    if has_next {
                        tokio::time::sleep(self.rate_limit_backoff).await;
                    }
                }
                AttemptOutcome::Skip(error) => {
                    warn!("Model {model} failed ({}): {error}", error.kind());
                    failures.push(ModelFailure {
                        model: model.clone(),
                        error,
                    });
                }
                AttemptOutcome::Fatal(error) => {
                    warn!("Model {model} failed fatally: {error}");
                    failures.push(ModelFailure {
                        model: model.clone(),
                        error,
                    });
                    return Err(GenerationFailed {
                        failures,
                        aborted: true,
                    });
                }
            }
        }

        Err(GenerationFailed {
            failures,
            aborted: false,
        })
    }
}
