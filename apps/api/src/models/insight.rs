use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandLevel::High => "High",
            DemandLevel::Medium => "Medium",
            DemandLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

impl MarketOutlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOutlook::Positive => "Positive",
            MarketOutlook::Neutral => "Neutral",
            MarketOutlook::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub location: String,
}

/// Per-industry market report. One row per industry, updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct IndustryInsight {
    pub id: Uuid,
    pub industry: String,
    pub salary_ranges: Json<Vec<SalaryRange>>,
    pub growth_rate: f64,
    pub demand_level: String,
    pub top_skills: Vec<String>,
    pub market_outlook: String,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

/// Generated insight content, as the model returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightFields {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_fields_deserialize() {
        let json = r#"{
            "salaryRanges": [
                {"role": "Analyst", "min": 50000, "max": 90000, "median": 70000, "location": "New York"}
            ],
            "growthRate": 4.5,
            "demandLevel": "High",
            "topSkills": ["Excel", "SQL"],
            "marketOutlook": "Positive",
            "keyTrends": ["Automation"],
            "recommendedSkills": ["Python"]
        }"#;
        let fields: InsightFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.demand_level, DemandLevel::High);
        assert_eq!(fields.market_outlook, MarketOutlook::Positive);
        assert_eq!(fields.salary_ranges[0].median, 70000.0);
        assert_eq!(fields.top_skills, vec!["Excel", "SQL"]);
    }

    #[test]
    fn test_insight_fields_reject_unknown_demand_level() {
        let json = r#"{
            "salaryRanges": [],
            "growthRate": 1.0,
            "demandLevel": "Extreme",
            "topSkills": [],
            "marketOutlook": "Neutral",
            "keyTrends": [],
            "recommendedSkills": []
        }"#;
        assert!(serde_json::from_str::<InsightFields>(json).is_err());
    }
}
