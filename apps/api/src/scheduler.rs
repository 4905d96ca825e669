//! Cron ticks: daily job refresh, weekly insight refresh.

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::Config;
use crate::models::report::summarize;
use crate::state::AppState;

/// Builds and starts the scheduler, or returns `None` when disabled.
/// The returned handle must be kept alive for the ticks to keep firing.
pub async fn start_scheduler(state: &AppState, config: &Config) -> Result<Option<JobScheduler>> {
    if !config.scheduler_enabled {
        info!("Scheduler disabled");
        return Ok(None);
    }

    let sched = JobScheduler::new().await.context("creating scheduler")?;

    let jobs = state.jobs.clone();
    let job_tick = Job::new_async(&config.jobs_refresh_cron, move |_uuid, _l| {
        let jobs = jobs.clone();
        Box::pin(async move {
            info!("Daily job refresh tick");
            match jobs.refresh_all().await {
                Ok(reports) => {
                    let (ok, failed) = summarize(&reports);
                    info!("Daily job refresh finished: {ok} succeeded, {failed} failed");
                }
                Err(e) => error!("Daily job refresh could not list industries: {e}"),
            }
        })
    })
    .with_context(|| format!("creating job refresh tick for cron {}", config.jobs_refresh_cron))?;
    sched.add(job_tick).await.context("adding job refresh tick")?;

    let insights = state.insights.clone();
    let insight_tick = Job::new_async(&config.insights_refresh_cron, move |_uuid, _l| {
        let insights = insights.clone();
        Box::pin(async move {
            info!("Weekly insight refresh tick");
            match insights.refresh_all().await {
                Ok(reports) => {
                    let (ok, failed) = summarize(&reports);
                    info!("Weekly insight refresh finished: {ok} succeeded, {failed} failed");
                }
                Err(e) => error!("Weekly insight refresh could not list industries: {e}"),
            }
        })
    })
    .with_context(|| {
        format!(
            "creating insight refresh tick for cron {}",
            config.insights_refresh_cron
        )
    })?;
    sched
        .add(insight_tick)
        .await
        .context("adding insight refresh tick")?;

    sched.start().await.context("starting scheduler")?;
    info!(
        "Scheduler started (jobs: '{}', insights: '{}')",
        config.jobs_refresh_cron, config.insights_refresh_cron
    );
    Ok(Some(sched))
}
