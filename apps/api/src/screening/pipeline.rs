//! Per-JD batch analysis.
//!
//! Each resume runs independently: extraction (spawn_blocking) → hard score
//! → one semantic call → aggregate. A semaphore bounds concurrency to
//! respect the semantic service's rate limits. Per-document failures never
//! abort the batch. Keyword extraction has already completed when a batch
//! starts; the keyword set arrives frozen in the ticket.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::{Config, ScoringConfig};
use crate::extract;
use crate::models::candidate::{AnalysisFailure, AnalysisStage, CandidateRecord};
use crate::models::job::ResumeUpload;
use crate::screening::semantic::SemanticAnalyzer;
use crate::screening::{aggregate, hard_match};

const MAX_RESUME_SIZE_MB: usize = 20;

pub struct BatchOutcome {
    pub records: Vec<CandidateRecord>,
    pub failures: Vec<AnalysisFailure>,
}

/// Analyzes a batch of uploaded resumes against one frozen JD snapshot.
pub async fn run_batch(
    jd_text: Arc<str>,
    keywords: Arc<[String]>,
    uploads: Vec<ResumeUpload>,
    first_seq: u64,
    analyzer: Arc<dyn SemanticAnalyzer>,
    config: &Config,
) -> BatchOutcome {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_analyses.max(1)));
    let scoring = config.scoring.clone();

    let mut handles = Vec::with_capacity(uploads.len());
    for (offset, upload) in uploads.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let jd_text = jd_text.clone();
        let keywords = keywords.clone();
        let analyzer = analyzer.clone();
        let scoring = scoring.clone();
        let seq = first_seq + offset as u64;

        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("analysis semaphore closed");
            analyze_one(seq, upload, &jd_text, &keywords, analyzer.as_ref(), &scoring).await
        }));
    }

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(failure)) => failures.push(failure),
            Err(e) => {
                warn!("analysis task aborted: {e}");
            }
        }
    }

    info!(
        analyzed = records.len(),
        failed = failures.len(),
        "resume batch finished"
    );
    BatchOutcome { records, failures }
}

async fn analyze_one(
    seq: u64,
    upload: ResumeUpload,
    jd_text: &str,
    keywords: &[String],
    analyzer: &dyn SemanticAnalyzer,
    scoring: &ScoringConfig,
) -> Result<CandidateRecord, AnalysisFailure> {
    let ResumeUpload {
        id,
        filename,
        content_type,
        bytes,
    } = upload;

    if bytes.len() > MAX_RESUME_SIZE_MB * 1024 * 1024 {
        return Err(AnalysisFailure {
            resume_id: id,
            filename,
            stage: AnalysisStage::Extraction,
            message: format!("resume exceeds the {MAX_RESUME_SIZE_MB} MB limit"),
        });
    }

    // Extraction is CPU-bound; keep it off the async executor.
    let extract_filename = filename.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        extract::extract_text(&bytes, &extract_filename, content_type.as_deref())
    })
    .await;

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(resume_id = %id, "text extraction failed: {e}");
            return Err(AnalysisFailure {
                resume_id: id,
                filename,
                stage: AnalysisStage::Extraction,
                message: e.to_string(),
            });
        }
        Err(e) => {
            return Err(AnalysisFailure {
                resume_id: id,
                filename,
                stage: AnalysisStage::Internal,
                message: format!("extraction task failed: {e}"),
            });
        }
    };

    let candidate_email = sniff_email(&text);
    let hard = hard_match::score(keywords, &text);

    // The one semantic call for this (JD, resume) pair.
    let semantic = match analyzer.analyze(jd_text, &text).await {
        Ok(semantic) => semantic,
        Err(e) => {
            warn!(resume_id = %id, "semantic analysis failed: {e}");
            return Err(AnalysisFailure {
                resume_id: id,
                filename,
                stage: AnalysisStage::Semantic,
                message: e.to_string(),
            });
        }
    };

    Ok(aggregate::aggregate(
        id,
        filename,
        candidate_email,
        seq,
        hard,
        semantic,
        scoring,
    ))
}

/// Best-effort candidate email sniff over the extracted resume text.
fn sniff_email(text: &str) -> Option<String> {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email pattern is valid")
    });
    re.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{SemanticResult, SemanticVerdict};
    use crate::screening::semantic::SemanticError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use uuid::Uuid;

    /// Scores by resume length; fails any resume containing "unreachable".
    struct StubAnalyzer;

    #[async_trait]
    impl SemanticAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _jd_text: &str,
            resume_text: &str,
        ) -> Result<SemanticResult, SemanticError> {
            if resume_text.contains("unreachable") {
                return Err(SemanticError::Unavailable("connection refused".to_string()));
            }
            Ok(SemanticResult {
                value: 80.0,
                verdict: SemanticVerdict::High,
                missing_skills: vec![],
                suggestions: "- Looks fine.".to_string(),
            })
        }
    }

    fn test_config() -> Config {
        Config {
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            scoring: ScoringConfig::default(),
            max_concurrent_analyses: 2,
            semantic_timeout_secs: 5,
        }
    }

    fn upload(name: &str, body: &str) -> ResumeUpload {
        ResumeUpload {
            id: Uuid::new_v4(),
            filename: format!("{name}.txt"),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::from(body.to_string()),
        }
    }

    fn jd_inputs() -> (Arc<str>, Arc<[String]>) {
        let keywords: Arc<[String]> = vec!["python".to_string(), "sql".to_string()].into();
        (Arc::from("Python and SQL role"), keywords)
    }

    #[tokio::test]
    async fn test_batch_produces_one_record_per_resume() {
        let (jd_text, keywords) = jd_inputs();
        let outcome = run_batch(
            jd_text,
            keywords,
            vec![
                upload("a", "Python and SQL everywhere"),
                upload("b", "Nothing relevant here"),
            ],
            0,
            Arc::new(StubAnalyzer),
            &test_config(),
        )
        .await;

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.failures.is_empty());
        let a = outcome
            .records
            .iter()
            .find(|r| r.filename == "a.txt")
            .unwrap();
        assert_eq!(a.hard.value, 100);
        assert_eq!(a.submitted_seq, 0);
    }

    #[tokio::test]
    async fn test_one_semantic_outage_does_not_abort_batch() {
        let (jd_text, keywords) = jd_inputs();
        let outcome = run_batch(
            jd_text,
            keywords,
            vec![
                upload("good-1", "Python developer"),
                upload("bad", "unreachable resume"),
                upload("good-2", "SQL analyst"),
            ],
            0,
            Arc::new(StubAnalyzer),
            &test_config(),
        )
        .await;

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        let failure = &outcome.failures[0];
        assert_eq!(failure.filename, "bad.txt");
        assert_eq!(failure.stage, AnalysisStage::Semantic);
        assert!(failure.message.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_extraction_failure_is_isolated() {
        let (jd_text, keywords) = jd_inputs();
        let mut bad = upload("broken", "");
        bad.filename = "broken.docx".to_string();
        bad.content_type = None;
        bad.bytes = Bytes::from_static(b"PK\x03\x04 not a real docx");

        let outcome = run_batch(
            jd_text,
            keywords,
            vec![bad, upload("fine", "Python and SQL")],
            0,
            Arc::new(StubAnalyzer),
            &test_config(),
        )
        .await;

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].stage, AnalysisStage::Extraction);
    }

    #[tokio::test]
    async fn test_oversized_resume_fails_that_document() {
        let (jd_text, keywords) = jd_inputs();
        let mut big = upload("big", "");
        big.bytes = Bytes::from(vec![b'a'; MAX_RESUME_SIZE_MB * 1024 * 1024 + 1]);

        let outcome = run_batch(
            jd_text,
            keywords,
            vec![big],
            0,
            Arc::new(StubAnalyzer),
            &test_config(),
        )
        .await;

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].message.contains("limit"));
    }

    #[test]
    fn test_sniff_email_finds_first_address() {
        let text = "Jane Doe\njane.doe+jobs@example.co.uk\nother@later.com";
        assert_eq!(
            sniff_email(text),
            Some("jane.doe+jobs@example.co.uk".to_string())
        );
    }

    #[test]
    fn test_sniff_email_none_when_absent() {
        assert_eq!(sniff_email("no contact details"), None);
    }
}
