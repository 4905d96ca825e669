//! Job refresh orchestrator.
//!
//! Read path: fetch active → staleness gate → generate (with retry) → parse →
//! commit (deactivate + create) → re-query. Any failure between generate and
//! commit serves the previously active batch unchanged.
//!
//! An industry never ends a refresh with zero active rows if it started with
//! some: nothing is deactivated until at least one valid entry exists, and
//! if every create fails the deactivated rows are restored.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::jobs::parser::{decode_job, parse_jobs};
use crate::jobs::prompts::{build_job_prompt, JOB_GENERATION_SYSTEM};
use crate::llm_client::gateway::{GenerationFailed, TextGateway};
use crate::llm_client::parse::MalformedResponse;
use crate::models::job::{JobOpportunity, NewJobOpportunity};
use crate::models::report::IndustryRefreshReport;
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::staleness::{is_stale, job_ttl};
use crate::store::{InsightStore, JobStore, StoreError};

/// Cap on rows served per industry.
pub const MAX_SERVED_JOBS: i64 = 20;

/// How the served set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    /// Existing batch younger than the TTL.
    Fresh,
    Refreshed,
    /// Refresh failed; previous batch served.
    Stale,
    /// Refresh failed and nothing was stored before.
    Empty,
}

#[derive(Debug, Serialize)]
pub struct JobFeed {
    pub industry: String,
    pub status: FeedStatus,
    pub jobs: Vec<JobOpportunity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub created: usize,
    /// Entries rejected during normalisation or failed on create.
    pub skipped: usize,
    pub deactivated: usize,
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Generation(#[from] GenerationFailed),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error("model returned no job entries")]
    EmptyBatch,

    #[error("none of the {0} generated entries were valid")]
    NoValidEntries(usize),

    #[error("all {0} entries failed to store; previous batch restored")]
    NothingStored(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct JobRefresher {
    jobs: Arc<dyn JobStore>,
    industries: Arc<dyn InsightStore>,
    gateway: TextGateway,
    retry: RetryPolicy,
}

impl JobRefresher {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        industries: Arc<dyn InsightStore>,
        gateway: TextGateway,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            jobs,
            industries,
            gateway,
            retry,
        }
    }

    /// Serves the active batch for an industry, refreshing it first when stale.
    /// Generation and parse failures never surface here.
    pub async fn get_job_opportunities(&self, industry: &str) -> Result<JobFeed, StoreError> {
        let existing = self.jobs.find_active(industry, MAX_SERVED_JOBS).await?;
        let newest = existing.iter().map(|j| j.created_at).max();

        if !is_stale(newest, Utc::now(), job_ttl()) {
            info!(
                "Serving {} fresh job(s) for industry {industry}",
                existing.len()
            );
            return Ok(JobFeed {
                industry: industry.to_string(),
                status: FeedStatus::Fresh,
                jobs: existing,
            });
        }

        info!("Jobs for industry {industry} are stale, refreshing");
        match self.refresh_industry(industry).await {
            Ok(summary) => {
                info!(
                    "Refreshed industry {industry}: created={}, skipped={}, deactivated={}",
                    summary.created, summary.skipped, summary.deactivated
                );
                let jobs = self.jobs.find_active(industry, MAX_SERVED_JOBS).await?;
                Ok(JobFeed {
                    industry: industry.to_string(),
                    status: FeedStatus::Refreshed,
                    jobs,
                })
            }
            Err(e) => {
                let status = if existing.is_empty() {
                    FeedStatus::Empty
                } else {
                    FeedStatus::Stale
                };
                warn!(
                    "Refresh failed for industry {industry}, serving {} existing job(s): {e}",
                    existing.len()
                );
                Ok(JobFeed {
                    industry: industry.to_string(),
                    status,
                    jobs: existing,
                })
            }
        }
    }

    /// Generate → parse → commit, with no staleness gate.
    pub async fn refresh_industry(&self, industry: &str) -> Result<BatchSummary, RefreshError> {
        let prompt = build_job_prompt(industry, Utc::now().date_naive());
        let raw = generate_with_retry(&self.gateway, self.retry, JOB_GENERATION_SYSTEM, &prompt)
            .await?;
        let parsed = parse_jobs(&raw)?;

        if parsed.jobs.is_empty() {
            return Err(RefreshError::EmptyBatch);
        }

        let generated = parsed.jobs.len();
        let mut skipped = 0;
        let mut valid = Vec::with_capacity(generated);
        for (idx, job) in parsed.jobs.into_iter().enumerate() {
            match decode_job(job) {
                Ok(job) => valid.push(job),
                Err(e) => {
                    warn!("Skipping generated job #{idx} for industry {industry}: {e}");
                    skipped += 1;
                }
            }
        }
        if valid.is_empty() {
            return Err(RefreshError::NoValidEntries(generated));
        }

        self.commit(industry, valid, skipped).await
    }

    async fn commit(
        &self,
        industry: &str,
        valid: Vec<NewJobOpportunity>,
        mut skipped: usize,
    ) -> Result<BatchSummary, RefreshError> {
        let deactivated = self.jobs.deactivate_all(industry).await?;

        let mut created = 0;
        for job in &valid {
            match self.jobs.create(industry, job).await {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!(
                        "Failed to store job '{}' for industry {industry}: {e}",
                        job.title
                    );
                    skipped += 1;
                }
            }
        }

        if created == 0 {
            let restored = match self.jobs.reactivate(&deactivated).await {
                Ok(restored) => restored,
                Err(e) => {
                    error!(
                        "Industry {industry} left with no active jobs; restore failed for ids {:?}: {e}",
                        deactivated
                    );
                    return Err(e.into());
                }
            };
            warn!("No jobs stored for industry {industry}; restored {restored} previous row(s)");
            return Err(RefreshError::NothingStored(valid.len()));
        }

        Ok(BatchSummary {
            created,
            skipped,
            deactivated: deactivated.len(),
        })
    }

    /// Unconditional refresh of every known industry, one at a time.
    pub async fn refresh_all(&self) -> Result<Vec<IndustryRefreshReport>, StoreError> {
        let industries = self.industries.list_all_industries().await?;
        info!("Refreshing jobs for {} industries", industries.len());

        let mut reports = Vec::with_capacity(industries.len());
        for industry in industries {
            let report = match self.refresh_industry(&industry).await {
                Ok(summary) => IndustryRefreshReport::success(&industry, Some(summary.created)),
                Err(e) => {
                    warn!("Job refresh failed for industry {industry}: {e}");
                    IndustryRefreshReport::failed(&industry, e)
                }
            };
            reports.push(report);
        }
        Ok(reports)
    }
}
