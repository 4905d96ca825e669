use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use crate::auth::require_admin;
use crate::errors::AppError;
use crate::jobs::handlers::IndustryQuery;
use crate::models::insight::IndustryInsight;
use crate::models::report::IndustryRefreshReport;
use crate::state::AppState;

/// GET /api/v1/insights?industry=
pub async fn handle_get_insight(
    State(state): State<AppState>,
    Query(params): Query<IndustryQuery>,
) -> Result<Json<IndustryInsight>, AppError> {
    let insight = state.insights.get_or_generate(params.industry()?).await?;
    Ok(Json(insight))
}

/// POST /api/v1/admin/insights/refresh
pub async fn handle_refresh_all_insights(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<IndustryRefreshReport>>, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    let reports = state.insights.refresh_all().await?;
    Ok(Json(reports))
}
