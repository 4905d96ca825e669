//! Persistence adapter contract for job batches and industry insights.
//!
//! No cross-record transaction is offered: each method is atomic on its own,
//! and the refresh path compensates with `reactivate` when a replacement
//! batch could not be written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::insight::{IndustryInsight, InsightFields};
use crate::models::job::{JobOpportunity, NewJobOpportunity};

pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Active rows for an industry, newest `posted_date` first.
    async fn find_active(
        &self,
        industry: &str,
        limit: i64,
    ) -> Result<Vec<JobOpportunity>, StoreError>;

    /// Soft-deletes every active row for the industry; returns the ids it
    /// deactivated (their count is the number of rows touched).
    async fn deactivate_all(&self, industry: &str) -> Result<Vec<Uuid>, StoreError>;

    /// Flips the given rows back to active.
    async fn reactivate(&self, ids: &[Uuid]) -> Result<u64, StoreError>;

    async fn create(
        &self,
        industry: &str,
        job: &NewJobOpportunity,
    ) -> Result<JobOpportunity, StoreError>;
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError>;

    async fn upsert_insight(
        &self,
        industry: &str,
        fields: &InsightFields,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Result<IndustryInsight, StoreError>;

    /// Every industry with an insight row, alphabetically.
    async fn list_all_industries(&self) -> Result<Vec<String>, StoreError>;
}
