use axum::http::HeaderMap;

use crate::errors::AppError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Guards the administrative trigger surface with the shared `ADMIN_TOKEN`.
pub fn require_admin(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if expected.is_empty() || presented != expected {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
