//! Parses a generated job batch and normalises each entry for storage.
//!
//! Batch shape is all-or-nothing (`MalformedResponse`): the `jobs` array must
//! exist. Each element is then decoded and validated on its own, so one
//! badly typed entry is rejected without taking the rest of the batch down.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::llm_client::parse::{parse_structured, MalformedResponse};
use crate::models::job::{JobType, NewJobOpportunity};

#[derive(Debug, Deserialize)]
pub struct GeneratedJobs {
    pub jobs: Vec<serde_json::Value>,
}

/// One listing exactly as the model wrote it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub platform: String,
    pub url: String,
    pub posted_date: String,
    pub deadline: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum EntryRejected {
    #[error("entry has the wrong shape: {0}")]
    InvalidShape(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unknown job type '{0}'")]
    UnknownJobType(String),

    #[error("unparsable postedDate '{0}'")]
    InvalidPostedDate(String),
}

pub fn parse_jobs(raw: &str) -> Result<GeneratedJobs, MalformedResponse> {
    parse_structured(raw)
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn required(value: String, field: &'static str) -> Result<String, EntryRejected> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(EntryRejected::MissingField(field));
    }
    Ok(value)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Decodes one raw batch element and normalises it.
pub fn decode_job(raw: serde_json::Value) -> Result<NewJobOpportunity, EntryRejected> {
    let job: GeneratedJob =
        serde_json::from_value(raw).map_err(|e| EntryRejected::InvalidShape(e.to_string()))?;
    normalize_job(job)
}

pub fn normalize_job(job: GeneratedJob) -> Result<NewJobOpportunity, EntryRejected> {
    let job_type = JobType::parse_loose(&job.job_type)
        .ok_or_else(|| EntryRejected::UnknownJobType(job.job_type.clone()))?;
    let posted_date = parse_date(&job.posted_date)
        .ok_or_else(|| EntryRejected::InvalidPostedDate(job.posted_date.clone()))?;

    Ok(NewJobOpportunity {
        title: required(job.title, "title")?,
        company: required(job.company, "company")?,
        location: job.location.trim().to_string(),
        job_type,
        description: job.description.trim().to_string(),
        requirements: clean_list(job.requirements),
        skills: clean_list(job.skills),
        salary: optional(job.salary),
        experience: optional(job.experience),
        deadline: optional(job.deadline).and_then(|d| parse_date(&d)),
        platform: required(job.platform, "platform")?,
        url: required(job.url, "url")?,
        posted_date,
    })
}
