// Industry insight LLM prompt templates.

pub const INSIGHT_SYSTEM: &str = "\
You are a labour-market analyst. \
You summarise industry conditions as structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const INSIGHT_PROMPT: &str = r#"Analyze the current state of the {industry} industry and provide insights.

OUTPUT SCHEMA (return exactly this structure):
{
  "salaryRanges": [
    { "role": "string", "min": number, "max": number, "median": number, "location": "string" }
  ],
  "growthRate": number,
  "demandLevel": "High" | "Medium" | "Low",
  "topSkills": ["string"],
  "marketOutlook": "Positive" | "Neutral" | "Negative",
  "keyTrends": ["string"],
  "recommendedSkills": ["string"]
}

Include at least 5 common roles in salaryRanges. growthRate is a percentage.
Include at least 5 entries each in topSkills, keyTrends and recommendedSkills."#;

pub fn build_insight_prompt(industry: &str) -> String {
    INSIGHT_PROMPT.replace("{industry}", industry)
}
