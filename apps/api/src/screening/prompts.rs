// All LLM prompt constants for the screening module.

/// System prompt for JD keyword extraction — enforces JSON-only output.
pub const KEYWORD_SYSTEM: &str = "You are an expert technical recruiter \
    extracting the skills and qualifications a job description requires. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keyword extraction prompt template. Replace `{jd_text}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Extract the required skills and qualifications from the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "keywords": ["python", "sql", "docker"]
}

Rules:
- Keywords are lowercase, short (1-3 words): concrete skills, tools, languages, frameworks, or qualifications.
- List them in order of importance to the role.
- Do NOT include generic filler ("team player", "fast-paced environment").
- Do NOT invent skills the job description does not mention.

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for resume analysis — enforces JSON-only output.
pub const ANALYZE_SYSTEM: &str = "You are an expert resume screener evaluating \
    how well a candidate's resume matches a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume analysis prompt template.
/// Replace `{jd_text}` and `{resume_text}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Evaluate the resume below against the job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 75,
  "verdict": "High",
  "missing_skills": ["kubernetes", "terraform"],
  "suggestions": "- Highlight cloud experience such as AWS.\n- Quantify achievements with metrics."
}

Rules:
- "score": an integer from 0 to 100 for overall match quality, where 100 means perfect match.
- "verdict": exactly one of "High", "Medium", "Low".
- "missing_skills": skills the job requires that the resume does not demonstrate.
- "suggestions": brief actionable advice to improve the resume for this role, formatted as bullet points.

JOB DESCRIPTION:
{jd_text}

RESUME:
{resume_text}"#;

/// Stricter system prompt for the single retry after a malformed response.
pub const ANALYZE_REFORMAT_SYSTEM: &str = "Your previous response was not a valid \
    JSON object matching the required schema. \
    Respond with ONLY a single JSON object with exactly the keys \
    \"score\", \"verdict\", \"missing_skills\", and \"suggestions\". \
    No markdown fences. No commentary. No text before or after the JSON object.";
