use std::sync::Arc;

use crate::config::Config;
use crate::insights::service::InsightService;
use crate::jobs::refresh::JobRefresher;

/// Shared application state injected into all route handlers via Axum extractors.
/// Also handed to the scheduler so cron ticks use the same services.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub jobs: Arc<JobRefresher>,
    pub insights: Arc<InsightService>,
}
