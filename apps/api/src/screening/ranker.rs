//! Deterministic ordering of candidate records.

use crate::models::candidate::CandidateRecord;

/// Ranks candidates: `final_score` descending, ties broken by `hard.value`
/// descending, then by submission order. Stable under repeated invocation
/// and independent of the input order produced by concurrent completion.
pub fn rank(mut records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    records.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| b.hard.value.cmp(&a.hard.value))
            .then_with(|| a.submitted_seq.cmp(&b.submitted_seq))
    });
    records
}
