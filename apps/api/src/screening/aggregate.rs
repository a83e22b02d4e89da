//! Combines the hard and semantic sub-scores into the final candidate record.
//!
//! Pure function; weights and verdict cut points come from configuration.

use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::candidate::{CandidateRecord, FitVerdict, HardScore, SemanticResult};

/// Builds the final record for one analyzed resume. Requires both sub-scores;
/// a record never exists without them.
pub fn aggregate(
    resume_id: Uuid,
    filename: String,
    candidate_email: Option<String>,
    submitted_seq: u64,
    hard: HardScore,
    semantic: SemanticResult,
    scoring: &ScoringConfig,
) -> CandidateRecord {
    let final_score =
        scoring.hard_weight * f64::from(hard.value) + scoring.semantic_weight * f64::from(semantic.value);
    let final_verdict = verdict_for(final_score, scoring);

    CandidateRecord {
        resume_id,
        filename,
        candidate_email,
        final_score,
        final_verdict,
        hard,
        semantic,
        submitted_seq,
    }
}

fn verdict_for(final_score: f64, scoring: &ScoringConfig) -> FitVerdict {
    if final_score >= scoring.strong_fit_threshold {
        FitVerdict::StrongFit
    } else if final_score >= scoring.moderate_fit_threshold {
        FitVerdict::ModerateFit
    } else {
        FitVerdict::WeakFit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::SemanticVerdict;

    fn hard(value: u32) -> HardScore {
        HardScore {
            value,
            matched_keywords: vec![],
            missing_keywords: vec![],
        }
    }

    fn semantic(value: f32) -> SemanticResult {
        SemanticResult {
            value,
            verdict: SemanticVerdict::Medium,
            missing_skills: vec![],
            suggestions: String::new(),
        }
    }

    fn record(hard_value: u32, semantic_value: f32, scoring: &ScoringConfig) -> CandidateRecord {
        aggregate(
            Uuid::new_v4(),
            "resume.pdf".to_string(),
            None,
            0,
            hard(hard_value),
            semantic(semantic_value),
            scoring,
        )
    }

    #[test]
    fn test_final_score_is_weighted_sum() {
        let scoring = ScoringConfig::default();
        let rec = record(50, 80.0, &scoring);
        // 0.4 * 50 + 0.6 * 80 = 68
        assert!((rec.final_score - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_strong_fit_at_threshold() {
        let scoring = ScoringConfig::default();
        let rec = record(75, 75.0, &scoring);
        assert_eq!(rec.final_verdict, FitVerdict::StrongFit);
    }

    #[test]
    fn test_moderate_fit_between_cut_points() {
        let scoring = ScoringConfig::default();
        let rec = record(50, 50.0, &scoring);
        assert_eq!(rec.final_verdict, FitVerdict::ModerateFit);
    }

    #[test]
    fn test_weak_fit_below_moderate() {
        let scoring = ScoringConfig::default();
        let rec = record(10, 20.0, &scoring);
        assert_eq!(rec.final_verdict, FitVerdict::WeakFit);
    }

    #[test]
    fn test_custom_weights_are_respected() {
        let scoring = ScoringConfig {
            hard_weight: 1.0,
            semantic_weight: 0.0,
            ..ScoringConfig::default()
        };
        let rec = record(66, 100.0, &scoring);
        assert!((rec.final_score - 66.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_carries_both_sub_scores() {
        let scoring = ScoringConfig::default();
        let rec = record(40, 60.0, &scoring);
        assert_eq!(rec.hard.value, 40);
        assert_eq!(rec.semantic.value, 60.0);
    }
}
