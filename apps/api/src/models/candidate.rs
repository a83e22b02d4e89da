use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deterministic keyword-overlap score for one resume against one JD.
///
/// `matched_keywords` and `missing_keywords` partition the JD keyword set:
/// every keyword appears in exactly one of the two, in keyword-set order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardScore {
    /// 0–100.
    pub value: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Verdict returned by the semantic service for one resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticVerdict {
    High,
    #[default]
    Medium,
    Low,
}

/// Validated output of one semantic analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticResult {
    /// 0–100, clamped at the parsing boundary.
    pub value: f32,
    pub verdict: SemanticVerdict,
    pub missing_skills: Vec<String>,
    pub suggestions: String,
}

/// Final thresholded verdict for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitVerdict {
    #[serde(rename = "Strong Fit")]
    StrongFit,
    #[serde(rename = "Moderate Fit")]
    ModerateFit,
    #[serde(rename = "Weak Fit")]
    WeakFit,
}

/// One fully analyzed candidate. Immutable once produced; exactly one record
/// per resume per JD, and only when both sub-scores exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub resume_id: Uuid,
    pub filename: String,
    pub candidate_email: Option<String>,
    pub final_score: f64,
    pub final_verdict: FitVerdict,
    pub hard: HardScore,
    pub semantic: SemanticResult,
    /// Upload order within the job; deterministic ranking tie-break.
    pub submitted_seq: u64,
}

/// Stage at which a per-document analysis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Extraction,
    Semantic,
    Internal,
}

/// A per-document failure. Failed documents are excluded from the ranking
/// and surfaced separately so the caller can retry just that document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub resume_id: Uuid,
    pub filename: String,
    pub stage: AnalysisStage,
    pub message: String,
}
