//! Bounded retry around a full gateway walk.
//!
//! Only a provider-wide "service unavailable" result is retried; every other
//! failure is returned on the first attempt.

use std::time::Duration;

use tracing::warn;

use crate::llm_client::gateway::{GenerationFailed, TextGateway};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay unit; the wait after attempt `n` is `base * 2^n`.
    pub base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base * 2u32.saturating_pow(attempt)
    }
}

pub async fn generate_with_retry(
    gateway: &TextGateway,
    policy: RetryPolicy,
    system: &str,
    prompt: &str,
) -> Result<String, GenerationFailed> {
    let mut attempt = 1;
    loop {
        match gateway.generate(system, prompt).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_service_unavailable() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Generation attempt {}/{} hit an unavailable provider, retrying after {}ms",
                    attempt,
                    policy.max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
