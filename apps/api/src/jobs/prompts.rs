// Job generation LLM prompt templates.

use chrono::NaiveDate;

/// Listings requested per batch.
pub const JOBS_PER_BATCH: usize = 10;

/// Source sites the model may attribute listings to.
pub const PLATFORMS: &[&str] = &[
    "LinkedIn",
    "Indeed",
    "Glassdoor",
    "Naukri",
    "Internshala",
    "Wellfound",
];

pub const JOB_GENERATION_SYSTEM: &str = "\
You are a job market research assistant. \
You produce realistic, current job listings as structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const JOB_GENERATION_PROMPT: &str = r#"Generate {count} realistic, currently open job opportunities in the {industry} industry.
Today's date is {current_date}. Every postedDate must fall within the last 14 days and no deadline may be in the past.
Attribute each listing to one of these platforms: {platforms}.
Mix the types across internship, full-time, part-time and contract roles.

OUTPUT SCHEMA (return exactly this structure):
{
  "jobs": [
    {
      "title": "string",
      "company": "string",
      "location": "string",
      "type": "internship" | "full-time" | "part-time" | "contract",
      "description": "string",
      "requirements": ["string"],
      "skills": ["string"],
      "salary": "string" | null,
      "experience": "string" | null,
      "platform": "string",
      "url": "string",
      "postedDate": "YYYY-MM-DD",
      "deadline": "YYYY-MM-DD" | null
    }
  ]
}"#;

pub fn build_job_prompt(industry: &str, today: NaiveDate) -> String {
    JOB_GENERATION_PROMPT
        .replace("{count}", &JOBS_PER_BATCH.to_string())
        .replace("{industry}", industry)
        .replace("{current_date}", &today.format("%Y-%m-%d").to_string())
        .replace("{platforms}", &PLATFORMS.join(", "))
}
