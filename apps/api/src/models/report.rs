use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    Success,
    Skipped,
    Error,
}

/// Per-industry line of a batch refresh run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryRefreshReport {
    pub industry: String,
    pub status: RefreshStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndustryRefreshReport {
    pub fn success(industry: &str, jobs_created: Option<usize>) -> Self {
        Self {
            industry: industry.to_string(),
            status: RefreshStatus::Success,
            jobs_created,
            error: None,
        }
    }

    pub fn skipped(industry: &str) -> Self {
        Self {
            industry: industry.to_string(),
            status: RefreshStatus::Skipped,
            jobs_created: None,
            error: None,
        }
    }

    pub fn failed(industry: &str, error: impl ToString) -> Self {
        Self {
            industry: industry.to_string(),
            status: RefreshStatus::Error,
            jobs_created: None,
            error: Some(error.to_string()),
        }
    }
}

/// Counts of a report set, for log lines.
pub fn summarize(reports: &[IndustryRefreshReport]) -> (usize, usize) {
    let failed = reports
        .iter()
        .filter(|r| r.status == RefreshStatus::Error)
        .count();
    (reports.len() - failed, failed)
}
