use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::insight::{IndustryInsight, InsightFields};
use crate::models::job::{JobOpportunity, NewJobOpportunity};
use crate::store::{InsightStore, JobStore, StoreError};

/// Postgres-backed store. Column names follow the camelCase storage schema.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE class 23: integrity constraint violations (CHECK, NOT NULL, UNIQUE, FK).
fn is_integrity_violation(code: &str) -> bool {
    code.starts_with("23")
}

/// Rows the schema refuses are reported as invalid records, not database faults.
fn write_error(e: sqlx::Error) -> StoreError {
    let rejected = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| is_integrity_violation(&code));
    if rejected {
        StoreError::InvalidRecord(e.to_string())
    } else {
        StoreError::Database(e)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn find_active(
        &self,
        industry: &str,
        limit: i64,
    ) -> Result<Vec<JobOpportunity>, StoreError> {
        Ok(sqlx::query_as::<_, JobOpportunity>(
            r#"
            SELECT * FROM "JobOpportunity"
            WHERE "industry" = $1 AND "isActive" = TRUE
            ORDER BY "postedDate" DESC
            LIMIT $2
            "#,
        )
        .bind(industry)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn deactivate_all(&self, industry: &str) -> Result<Vec<Uuid>, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE "JobOpportunity"
            SET "isActive" = FALSE, "updatedAt" = NOW()
            WHERE "industry" = $1 AND "isActive" = TRUE
            RETURNING "id"
            "#,
        )
        .bind(industry)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn reactivate(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            UPDATE "JobOpportunity"
            SET "isActive" = TRUE, "updatedAt" = NOW()
            WHERE "id" = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn create(
        &self,
        industry: &str,
        job: &NewJobOpportunity,
    ) -> Result<JobOpportunity, StoreError> {
        let row = sqlx::query_as::<_, JobOpportunity>(
            r#"
            INSERT INTO "JobOpportunity"
                ("id", "title", "company", "location", "type", "industry", "description",
                 "requirements", "skills", "salary", "experience", "deadline",
                 "platform", "url", "postedDate", "isActive")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type.as_str())
        .bind(industry)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.skills)
        .bind(&job.salary)
        .bind(&job.experience)
        .bind(job.deadline)
        .bind(&job.platform)
        .bind(&job.url)
        .bind(job.posted_date)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        debug!("Created job opportunity {} for industry {industry}", row.id);
        Ok(row)
    }
}

#[async_trait]
impl InsightStore for PgStore {
    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            r#"SELECT * FROM "IndustryInsight" WHERE "industry" = $1"#,
        )
        .bind(industry)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_insight(
        &self,
        industry: &str,
        fields: &InsightFields,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Result<IndustryInsight, StoreError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            r#"
            INSERT INTO "IndustryInsight"
                ("id", "industry", "salaryRanges", "growthRate", "demandLevel", "topSkills",
                 "marketOutlook", "keyTrends", "recommendedSkills", "lastUpdated", "nextUpdate")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT ("industry") DO UPDATE SET
                "salaryRanges" = EXCLUDED."salaryRanges",
                "growthRate" = EXCLUDED."growthRate",
                "demandLevel" = EXCLUDED."demandLevel",
                "topSkills" = EXCLUDED."topSkills",
                "marketOutlook" = EXCLUDED."marketOutlook",
                "keyTrends" = EXCLUDED."keyTrends",
                "recommendedSkills" = EXCLUDED."recommendedSkills",
                "lastUpdated" = EXCLUDED."lastUpdated",
                "nextUpdate" = EXCLUDED."nextUpdate"
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(industry)
        .bind(Json(&fields.salary_ranges))
        .bind(fields.growth_rate)
        .bind(fields.demand_level.as_str())
        .bind(&fields.top_skills)
        .bind(fields.market_outlook.as_str())
        .bind(&fields.key_trends)
        .bind(&fields.recommended_skills)
        .bind(last_updated)
        .bind(next_update)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?)
    }

    async fn list_all_industries(&self) -> Result<Vec<String>, StoreError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"SELECT "industry" FROM "IndustryInsight" ORDER BY "industry" ASC"#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
