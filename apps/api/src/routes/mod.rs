pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::insights::handlers as insight_handlers;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Read path
        .route("/api/v1/jobs", get(job_handlers::handle_get_jobs))
        .route("/api/v1/insights", get(insight_handlers::handle_get_insight))
        // Administrative triggers
        .route(
            "/api/v1/admin/jobs/refresh",
            post(job_handlers::handle_refresh_all_jobs),
        )
        .route(
            "/api/v1/admin/insights/refresh",
            post(insight_handlers::handle_refresh_all_insights),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::insights::service::InsightService;
    use crate::jobs::refresh::JobRefresher;
    use crate::retry::RetryPolicy;
    use crate::test_support::{test_gateway, MemoryStore, ScriptedBackend};

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            anthropic_api_key: "test-key".to_string(),
            admin_token: "admin-secret".to_string(),
            llm_models: vec!["primary".to_string()],
            llm_timeout_secs: 5,
            rate_limit_backoff_secs: 2,
            scheduler_enabled: false,
            jobs_refresh_cron: "0 0 3 * * *".to_string(),
            insights_refresh_cron: "0 0 4 * * Mon".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(store: Arc<MemoryStore>, backend: Arc<ScriptedBackend>) -> Router {
        let gateway = test_gateway(backend, &["primary"]);
        build_router(AppState {
            config: test_config(),
            jobs: Arc::new(JobRefresher::new(
                store.clone(),
                store.clone(),
                gateway.clone(),
                RetryPolicy::default(),
            )),
            insights: Arc::new(InsightService::new(store, gateway, RetryPolicy::default())),
        })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_jobs_serves_fresh_batch() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        store.seed_job("tech", "Seed", now - Duration::hours(2), now);

        let response = app(store, Arc::new(ScriptedBackend::new()))
            .oneshot(
                Request::get("/api/v1/jobs?industry=tech")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "fresh");
        assert_eq!(body["jobs"][0]["title"], "Seed");
        assert_eq!(body["jobs"][0]["isActive"], true);
        assert_eq!(body["jobs"][0]["type"], "full-time");
    }

    #[tokio::test]
    async fn test_get_jobs_cold_start_failure_is_empty_not_error() {
        let response = app(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedBackend::new()),
        )
        .oneshot(
            Request::get("/api/v1/jobs?industry=finance")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "empty");
        assert_eq!(body["jobs"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_blank_industry_is_rejected() {
        let response = app(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedBackend::new()),
        )
        .oneshot(
            Request::get("/api/v1/jobs?industry=%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_industry_uses_json_error_body() {
        for uri in ["/api/v1/jobs", "/api/v1/insights"] {
            let response = app(
                Arc::new(MemoryStore::new()),
                Arc::new(ScriptedBackend::new()),
            )
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_admin_refresh_requires_token() {
        let response = app(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedBackend::new()),
        )
        .oneshot(
            Request::post("/api/v1/admin/jobs/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_refresh_returns_report_per_industry() {
        let store = Arc::new(MemoryStore::new());
        store.seed_insight(
            "finance",
            &crate::models::insight::InsightFields {
                salary_ranges: vec![],
                growth_rate: 2.0,
                demand_level: crate::models::insight::DemandLevel::High,
                top_skills: vec![],
                market_outlook: crate::models::insight::MarketOutlook::Positive,
                key_trends: vec![],
                recommended_skills: vec![],
            },
            Utc::now(),
        );

        let response = app(store, Arc::new(ScriptedBackend::new()))
            .oneshot(
                Request::post("/api/v1/admin/jobs/refresh")
                    .header("x-admin-token", "admin-secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["industry"], "finance");
        assert_eq!(body[0]["status"], "error");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedBackend::new()),
        )
        .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
