mod auth;
mod config;
mod db;
mod errors;
mod insights;
mod jobs;
mod llm_client;
mod models;
mod retry;
mod routes;
mod scheduler;
mod staleness;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::insights::service::InsightService;
use crate::jobs::refresh::JobRefresher;
use crate::llm_client::gateway::TextGateway;
use crate::llm_client::AnthropicBackend;
use crate::retry::RetryPolicy;
use crate::routes::build_router;
use crate::scheduler::start_scheduler;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize the text gateway from explicit, validated provider config
    let gateway_config = config.gateway_config();
    let backend = Arc::new(AnthropicBackend::new(
        gateway_config.api_key.clone(),
        gateway_config.request_timeout,
    )?);
    let gateway = TextGateway::new(backend, &gateway_config)?;
    info!("Text gateway initialized (models: {})", gateway.models().join(", "));

    let state = AppState {
        config: config.clone(),
        jobs: Arc::new(JobRefresher::new(
            store.clone(),
            store.clone(),
            gateway.clone(),
            RetryPolicy::default(),
        )),
        insights: Arc::new(InsightService::new(store, gateway, RetryPolicy::default())),
    };

    // Keep the handle alive for the lifetime of the server
    let _scheduler = start_scheduler(&state, &config).await?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
