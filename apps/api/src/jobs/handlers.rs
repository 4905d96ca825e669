use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::auth::require_admin;
use crate::errors::AppError;
use crate::jobs::refresh::JobFeed;
use crate::models::report::IndustryRefreshReport;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IndustryQuery {
    #[serde(default)]
    pub industry: Option<String>,
}

impl IndustryQuery {
    pub fn industry(&self) -> Result<&str, AppError> {
        let industry = self.industry.as_deref().unwrap_or_default().trim();
        if industry.is_empty() {
            return Err(AppError::Validation("industry must not be empty".to_string()));
        }
        Ok(industry)
    }
}

/// GET /api/v1/jobs?industry=
pub async fn handle_get_jobs(
    State(state): State<AppState>,
    Query(params): Query<IndustryQuery>,
) -> Result<Json<JobFeed>, AppError> {
    let feed = state.jobs.get_job_opportunities(params.industry()?).await?;
    Ok(Json(feed))
}

/// POST /api/v1/admin/jobs/refresh
pub async fn handle_refresh_all_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<IndustryRefreshReport>>, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    let reports = state.jobs.refresh_all().await?;
    Ok(Json(reports))
}
