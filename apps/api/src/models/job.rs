use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A job description submitted for screening.
///
/// `keywords` is computed exactly once when the JD is processed and is
/// immutable afterward. Re-submitting the JD replaces the whole record.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescription {
    pub id: Uuid,
    pub raw_text: String,
    /// Ordered, exact-deduplicated, normalized keyword set.
    pub keywords: Vec<String>,
    /// True when keyword extraction fell back to the offline lexicon.
    pub degraded_keywords: bool,
    pub created_at: DateTime<Utc>,
}

/// An uploaded resume document, before text extraction.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}
