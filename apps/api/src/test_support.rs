//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::llm_client::gateway::{GatewayConfig, TextGateway};
use crate::llm_client::{CompletionBackend, CompletionError};
use crate::models::insight::{IndustryInsight, InsightFields};
use crate::models::job::{JobOpportunity, NewJobOpportunity};
use crate::store::{InsightStore, JobStore, StoreError};

/// Replays queued outcomes per model and records every call.
/// A model with nothing queued answers `NotFound`.
#[derive(Default)]
pub struct ScriptedBackend {
    queued: Mutex<HashMap<String, VecDeque<Result<String, CompletionError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, model: &str, outcome: Result<String, CompletionError>) {
        self.queued
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        model: &str,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(model.to_string());
        self.queued
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Err(CompletionError::NotFound(format!("{model} not scripted"))))
    }
}

pub fn test_gateway(backend: Arc<ScriptedBackend>, models: &[&str]) -> TextGateway {
    let config = GatewayConfig {
        api_key: "test-key".to_string(),
        models: models.iter().map(|m| m.to_string()).collect(),
        rate_limit_backoff: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
    };
    TextGateway::new(backend, &config).unwrap()
}

/// Store with the same ordering and activation semantics as `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    jobs: Mutex<Vec<JobOpportunity>>,
    insights: Mutex<Vec<IndustryInsight>>,
    failing_titles: Mutex<HashSet<String>>,
    fail_reactivate: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create` fail for any job with this title.
    pub fn fail_creates_titled(&self, title: &str) {
        self.failing_titles.lock().unwrap().insert(title.to_string());
    }

    /// Makes every `reactivate` call fail.
    pub fn fail_reactivation(&self) {
        *self.fail_reactivate.lock().unwrap() = true;
    }

    /// Inserts an active job created `created_at`, posted `posted_date`.
    pub fn seed_job(
        &self,
        industry: &str,
        title: &str,
        created_at: DateTime<Utc>,
        posted_date: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs.lock().unwrap().push(JobOpportunity {
            id,
            title: title.to_string(),
            company: "Seed Co".to_string(),
            location: "Remote".to_string(),
            job_type: "full-time".to_string(),
            industry: industry.to_string(),
            description: "Seeded listing".to_string(),
            requirements: vec![],
            skills: vec![],
            salary: None,
            experience: None,
            deadline: None,
            platform: "LinkedIn".to_string(),
            url: format!("https://example.com/{id}"),
            posted_date,
            is_active: true,
            created_at,
            updated_at: created_at,
        });
        id
    }

    pub fn seed_insight(&self, industry: &str, fields: &InsightFields, last_updated: DateTime<Utc>) {
        self.insights.lock().unwrap().push(insight_row(
            industry,
            fields,
            last_updated,
            last_updated + crate::staleness::insight_ttl(),
        ));
    }

    pub fn all_jobs(&self, industry: &str) -> Vec<JobOpportunity> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.industry == industry)
            .cloned()
            .collect()
    }

    pub fn active_count(&self, industry: &str) -> usize {
        self.all_jobs(industry).iter().filter(|j| j.is_active).count()
    }
}

fn insight_row(
    industry: &str,
    fields: &InsightFields,
    last_updated: DateTime<Utc>,
    next_update: DateTime<Utc>,
) -> IndustryInsight {
    IndustryInsight {
        id: Uuid::new_v4(),
        industry: industry.to_string(),
        salary_ranges: Json(fields.salary_ranges.clone()),
        growth_rate: fields.growth_rate,
        demand_level: fields.demand_level.as_str().to_string(),
        top_skills: fields.top_skills.clone(),
        market_outlook: fields.market_outlook.as_str().to_string(),
        key_trends: fields.key_trends.clone(),
        recommended_skills: fields.recommended_skills.clone(),
        last_updated,
        next_update,
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn find_active(
        &self,
        industry: &str,
        limit: i64,
    ) -> Result<Vec<JobOpportunity>, StoreError> {
        let mut active: Vec<JobOpportunity> = self
            .all_jobs(industry)
            .into_iter()
            .filter(|j| j.is_active)
            .collect();
        active.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
        active.truncate(limit.max(0) as usize);
        Ok(active)
    }

    async fn deactivate_all(&self, industry: &str) -> Result<Vec<Uuid>, StoreError> {
        let mut ids = Vec::new();
        for job in self.jobs.lock().unwrap().iter_mut() {
            if job.industry == industry && job.is_active {
                job.is_active = false;
                job.updated_at = Utc::now();
                ids.push(job.id);
            }
        }
        Ok(ids)
    }

    async fn reactivate(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        if *self.fail_reactivate.lock().unwrap() {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut count = 0;
        for job in self.jobs.lock().unwrap().iter_mut() {
            if ids.contains(&job.id) {
                job.is_active = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn create(
        &self,
        industry: &str,
        job: &NewJobOpportunity,
    ) -> Result<JobOpportunity, StoreError> {
        if self.failing_titles.lock().unwrap().contains(&job.title) {
            return Err(StoreError::InvalidRecord(format!("rejected '{}'", job.title)));
        }
        let now = Utc::now();
        let row = JobOpportunity {
            id: Uuid::new_v4(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.as_str().to_string(),
            industry: industry.to_string(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            skills: job.skills.clone(),
            salary: job.salary.clone(),
            experience: job.experience.clone(),
            deadline: job.deadline,
            platform: job.platform.clone(),
            url: job.url.clone(),
            posted_date: job.posted_date,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl InsightStore for MemoryStore {
    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError> {
        Ok(self
            .insights
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.industry == industry)
            .cloned())
    }

    async fn upsert_insight(
        &self,
        industry: &str,
        fields: &InsightFields,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Result<IndustryInsight, StoreError> {
        let mut insights = self.insights.lock().unwrap();
        let mut row = insight_row(industry, fields, last_updated, next_update);
        if let Some(existing) = insights.iter_mut().find(|i| i.industry == industry) {
            row.id = existing.id;
            *existing = row.clone();
        } else {
            insights.push(row.clone());
        }
        Ok(row)
    }

    async fn list_all_industries(&self) -> Result<Vec<String>, StoreError> {
        let mut industries: Vec<String> = self
            .insights
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.industry.clone())
            .collect();
        industries.sort();
        Ok(industries)
    }
}
