//! Structured-output parsing for model responses.
//!
//! Models often wrap JSON in markdown fences despite being told not to, so the
//! fences are stripped before deserializing. Parsing is all-or-nothing.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("malformed model response: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
}

/// Strips leading/trailing ``` fences (with or without a language tag) and
/// surrounding whitespace.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // language tag, e.g. ```json or ```JSON
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

/// Parses fenced or bare JSON into `T`.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, MalformedResponse> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(MalformedResponse {
            reason: "empty response".to_string(),
        });
    }
    serde_json::from_str(text).map_err(|e| MalformedResponse {
        reason: e.to_string(),
    })
}
