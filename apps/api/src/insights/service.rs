//! Industry insight service.
//!
//! One row per industry, created on first request and updated in place when
//! older than a week. A failed regeneration keeps serving the stored row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::insights::prompts::{build_insight_prompt, INSIGHT_SYSTEM};
use crate::llm_client::gateway::{GenerationFailed, TextGateway};
use crate::llm_client::parse::{parse_structured, MalformedResponse};
use crate::models::insight::{IndustryInsight, InsightFields};
use crate::models::report::IndustryRefreshReport;
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::staleness::{insight_ttl, is_stale};
use crate::store::{InsightStore, StoreError};

#[derive(Debug, Error)]
pub enum InsightError {
    #[error(transparent)]
    Generation(#[from] GenerationFailed),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct InsightService {
    store: Arc<dyn InsightStore>,
    gateway: TextGateway,
    retry: RetryPolicy,
}

impl InsightService {
    pub fn new(store: Arc<dyn InsightStore>, gateway: TextGateway, retry: RetryPolicy) -> Self {
        Self {
            store,
            gateway,
            retry,
        }
    }

    pub async fn get_or_generate(&self, industry: &str) -> Result<IndustryInsight, AppError> {
        let existing = self.store.find_insight(industry).await?;
        let now = Utc::now();

        if let Some(insight) = &existing {
            if !is_stale(Some(insight.last_updated), now, insight_ttl()) {
                return Ok(insight.clone());
            }
        }

        match self.regenerate(industry, now).await {
            Ok(insight) => Ok(insight),
            Err(InsightError::Store(e)) => Err(e.into()),
            Err(e) => match existing {
                Some(insight) => {
                    warn!("Insight refresh failed for industry {industry}, serving stored: {e}");
                    Ok(insight)
                }
                None => Err(AppError::Llm(format!(
                    "Could not generate insights for industry {industry}: {e}"
                ))),
            },
        }
    }

    async fn regenerate(
        &self,
        industry: &str,
        now: DateTime<Utc>,
    ) -> Result<IndustryInsight, InsightError> {
        let prompt = build_insight_prompt(industry);
        let raw = generate_with_retry(&self.gateway, self.retry, INSIGHT_SYSTEM, &prompt).await?;
        let fields: InsightFields = parse_structured(&raw)?;
        let insight = self
            .store
            .upsert_insight(industry, &fields, now, now + insight_ttl())
            .await?;
        info!("Stored insights for industry {industry}");
        Ok(insight)
    }

    /// Regenerates every insight whose `next_update` has passed, sequentially.
    pub async fn refresh_all(&self) -> Result<Vec<IndustryRefreshReport>, StoreError> {
        let industries = self.store.list_all_industries().await?;
        let mut reports = Vec::with_capacity(industries.len());

        for industry in industries {
            let now = Utc::now();
            let due = match self.store.find_insight(&industry).await? {
                Some(insight) => insight.next_update <= now,
                None => true,
            };
            if !due {
                reports.push(IndustryRefreshReport::skipped(&industry));
                continue;
            }

            let report = match self.regenerate(&industry, now).await {
                Ok(_) => IndustryRefreshReport::success(&industry, None),
                Err(e) => {
                    warn!("Insight refresh failed for industry {industry}: {e}");
                    IndustryRefreshReport::failed(&industry, e)
                }
            };
            reports.push(report);
        }
        Ok(reports)
    }
}
