//! Freshness policy shared by job batches and industry insights.

use chrono::{DateTime, Duration, Utc};

/// Maximum age of the newest job batch before a refresh is attempted.
pub fn job_ttl() -> Duration {
    Duration::days(3)
}

/// Maximum age of an industry insight before it is regenerated.
pub fn insight_ttl() -> Duration {
    Duration::days(7)
}

/// Stale when nothing exists yet, or the newest record is older than `ttl`.
pub fn is_stale(most_recent: Option<DateTime<Utc>>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match most_recent {
        None => true,
        Some(created_at) => now - created_at > ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_records_are_stale() {
        assert!(is_stale(None, Utc::now(), job_ttl()));
    }

    #[test]
    fn test_four_day_old_jobs_are_stale() {
        let now = Utc::now();
        assert!(is_stale(Some(now - Duration::days(4)), now, job_ttl()));
    }

    #[test]
    fn test_two_day_old_jobs_are_fresh() {
        let now = Utc::now();
        assert!(!is_stale(Some(now - Duration::days(2)), now, job_ttl()));
    }

    #[test]
    fn test_exactly_ttl_old_is_fresh() {
        let now = Utc::now();
        assert!(!is_stale(Some(now - job_ttl()), now, job_ttl()));
    }

    #[test]
    fn test_insight_ttl_is_a_week() {
        let now = Utc::now();
        assert!(!is_stale(Some(now - Duration::days(6)), now, insight_ttl()));
        assert!(is_stale(Some(now - Duration::days(8)), now, insight_ttl()));
    }
}
