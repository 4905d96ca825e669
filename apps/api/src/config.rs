use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::gateway::GatewayConfig;

const DEFAULT_MODELS: &str = "claude-haiku-4-5,claude-sonnet-4-5,claude-3-5-haiku-latest";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub admin_token: String,
    /// Ranked model identifiers; earlier entries are tried first.
    pub llm_models: Vec<String>,
    pub llm_timeout_secs: u64,
    pub rate_limit_backoff_secs: u64,
    pub scheduler_enabled: bool,
    pub jobs_refresh_cron: String,
    pub insights_refresh_cron: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            admin_token: require_env("ADMIN_TOKEN")?,
            llm_models: parse_model_list(
                &std::env::var("LLM_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.to_string()),
            ),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            rate_limit_backoff_secs: parse_env("RATE_LIMIT_BACKOFF_SECS", 2)?,
            scheduler_enabled: parse_env("SCHEDULER_ENABLED", true)?,
            jobs_refresh_cron: std::env::var("JOBS_REFRESH_CRON")
                .unwrap_or_else(|_| "0 0 3 * * *".to_string()),
            insights_refresh_cron: std::env::var("INSIGHTS_REFRESH_CRON")
                .unwrap_or_else(|_| "0 0 4 * * Mon".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Builds the explicit provider configuration handed to the text gateway.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            api_key: self.anthropic_api_key.clone(),
            models: self.llm_models.clone(),
            rate_limit_backoff: Duration::from_secs(self.rate_limit_backoff_secs),
            request_timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated model list, dropping blanks and duplicates while
/// keeping the original ranking.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for model in raw.split(',').map(str::trim).filter(|m| !m.is_empty()) {
        if !models.iter().any(|m| m == model) {
            models.push(model.to_string());
        }
    }
    models
}
