use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment type of a listing. Stored as its kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    Internship,
    FullTime,
    PartTime,
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Internship => "internship",
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
        }
    }

    /// Accepts the spellings models actually produce: any case, and
    /// `-`, `_`, space or nothing between words.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "internship" | "intern" => Some(JobType::Internship),
            "fulltime" => Some(JobType::FullTime),
            "parttime" => Some(JobType::PartTime),
            "contract" | "contractor" => Some(JobType::Contract),
            _ => None,
        }
    }
}

/// A persisted job listing. Rows belong to one generation batch; only the
/// current batch for an industry has `is_active = true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct JobOpportunity {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub job_type: String,
    pub industry: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub platform: String,
    pub url: String,
    pub posted_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a row about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobOpportunity {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub platform: String,
    pub url: String,
    pub posted_date: DateTime<Utc>,
}
