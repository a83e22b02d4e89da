//! Semantic resume analysis via the external LLM service.
//!
//! The analyzer is a narrow trait so the provider is swappable and mockable
//! without touching the aggregator or ranker. Responses are validated at
//! this boundary; no untyped data flows past it.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::models::candidate::{SemanticResult, SemanticVerdict};
use crate::screening::prompts::{
    ANALYZE_PROMPT_TEMPLATE, ANALYZE_REFORMAT_SYSTEM, ANALYZE_SYSTEM,
};

#[derive(Debug, Error)]
pub enum SemanticError {
    /// Network/auth/API failure. Never substituted with a zero score.
    #[error("semantic service unavailable: {0}")]
    Unavailable(String),

    /// Response failed schema validation, after the one permitted retry.
    #[error("semantic service returned malformed output: {0}")]
    Malformed(String),
}

/// The semantic analyzer boundary. Carried in `AppState` as
/// `Arc<dyn SemanticAnalyzer>`.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        jd_text: &str,
        resume_text: &str,
    ) -> Result<SemanticResult, SemanticError>;
}

/// Claude-backed analyzer. One call per (JD, resume) pair per run, plus at
/// most one reformat retry when the response fails schema validation.
pub struct ClaudeAnalyzer {
    llm: LlmClient,
}

impl ClaudeAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn call_once(&self, prompt: &str, system: &str) -> Result<RawAnalysis, SemanticError> {
        self.llm
            .call_json::<RawAnalysis>(prompt, system)
            .await
            .map_err(|e| match e {
                LlmError::Parse(parse) => SemanticError::Malformed(parse.to_string()),
                LlmError::EmptyContent => {
                    SemanticError::Malformed("empty response content".to_string())
                }
                other => SemanticError::Unavailable(other.to_string()),
            })
    }
}

#[async_trait]
impl SemanticAnalyzer for ClaudeAnalyzer {
    async fn analyze(
        &self,
        jd_text: &str,
        resume_text: &str,
    ) -> Result<SemanticResult, SemanticError> {
        let prompt = ANALYZE_PROMPT_TEMPLATE
            .replace("{jd_text}", jd_text)
            .replace("{resume_text}", resume_text);

        match self.call_once(&prompt, ANALYZE_SYSTEM).await {
            Ok(raw) => Ok(validate_analysis(raw)),
            Err(SemanticError::Malformed(first)) => {
                warn!("semantic response failed validation, retrying with reformat instruction: {first}");
                let raw = self.call_once(&prompt, ANALYZE_REFORMAT_SYSTEM).await?;
                Ok(validate_analysis(raw))
            }
            Err(e) => Err(e),
        }
    }
}

/// Wire shape of the semantic response, before validation.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    score: f64,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    suggestions: String,
}

/// Converts the wire shape into a validated `SemanticResult`: score clamped
/// to [0,100], unrecognized verdicts mapped to Medium with a logged anomaly,
/// absent fields defaulted.
fn validate_analysis(raw: RawAnalysis) -> SemanticResult {
    let value = raw.score.clamp(0.0, 100.0) as f32;
    let verdict = match raw.verdict.as_deref() {
        Some(label) => parse_verdict(label),
        None => {
            warn!("semantic response omitted verdict, defaulting to Medium");
            SemanticVerdict::Medium
        }
    };
    SemanticResult {
        value,
        verdict,
        missing_skills: raw.missing_skills,
        suggestions: raw.suggestions,
    }
}

fn parse_verdict(label: &str) -> SemanticVerdict {
    match label.trim().to_lowercase().as_str() {
        "high" => SemanticVerdict::High,
        "medium" => SemanticVerdict::Medium,
        "low" => SemanticVerdict::Low,
        other => {
            warn!("unrecognized semantic verdict {other:?}, defaulting to Medium");
            SemanticVerdict::Medium
        }
    }
}
