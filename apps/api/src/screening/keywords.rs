//! Keyword extraction from a job description.
//!
//! Primary path: one LLM call returning a JSON keyword list. Fallback: a
//! deterministic lexicon scan, flagged as degraded. Keyword extraction never
//! hard-fails the screening flow.

use serde::Deserialize;
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::screening::prompts::{KEYWORD_PROMPT_TEMPLATE, KEYWORD_SYSTEM};

/// Skills recognized by the offline fallback extractor. Lowercase; multi-word
/// entries are matched as phrases.
const SKILL_LEXICON: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "rust",
    "go",
    "c++",
    "c#",
    "sql",
    "nosql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "react",
    "angular",
    "vue",
    "nodejs",
    "django",
    "flask",
    "spring",
    "docker",
    "kubernetes",
    "terraform",
    "aws",
    "azure",
    "gcp",
    "linux",
    "git",
    "ci/cd",
    "machine learning",
    "deep learning",
    "data analysis",
    "nlp",
    "excel",
    "rest api",
    "graphql",
    "microservices",
    "agile",
    "communication",
    "teamwork",
    "project management",
];

#[derive(Debug, Deserialize)]
struct KeywordResponse {
    keywords: Vec<String>,
}

/// Outcome of keyword extraction for one JD.
#[derive(Debug, Clone)]
pub struct KeywordExtraction {
    pub keywords: Vec<String>,
    /// True when the LLM path failed and the lexicon fallback was used.
    pub degraded: bool,
}

/// Extracts the JD keyword set. The LLM path is attempted once; any failure
/// degrades to the lexicon fallback instead of aborting the flow.
pub async fn extract_keywords(jd_text: &str, llm: &LlmClient) -> KeywordExtraction {
    match llm_keywords(jd_text, llm).await {
        Ok(keywords) if !keywords.is_empty() => KeywordExtraction {
            keywords,
            degraded: false,
        },
        Ok(_) => {
            warn!("LLM keyword extraction returned nothing usable, falling back to lexicon");
            KeywordExtraction {
                keywords: lexicon_keywords(jd_text),
                degraded: true,
            }
        }
        Err(e) => {
            warn!("keyword extraction degraded to lexicon fallback: {e}");
            KeywordExtraction {
                keywords: lexicon_keywords(jd_text),
                degraded: true,
            }
        }
    }
}

async fn llm_keywords(jd_text: &str, llm: &LlmClient) -> Result<Vec<String>, LlmError> {
    let prompt = KEYWORD_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
    let response: KeywordResponse = llm.call_json(&prompt, KEYWORD_SYSTEM).await?;
    Ok(normalize_keywords(response.keywords))
}

/// Normalizes raw keywords: lowercase, surrounding punctuation stripped,
/// inner whitespace collapsed, empties dropped, exact-string dedup preserving
/// first-seen order.
pub fn normalize_keywords(raw: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut keywords = Vec::new();
    for kw in raw {
        if let Some(normalized) = normalize_keyword(&kw) {
            if seen.insert(normalized.clone()) {
                keywords.push(normalized);
            }
        }
    }
    keywords
}

fn normalize_keyword(raw: &str) -> Option<String> {
    const STRIP: &[char] = &[
        '"', '\'', '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}',
    ];
    let trimmed = raw.trim().trim_matches(STRIP);
    let normalized = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Deterministic fallback: lexicon entries found in the JD, ordered by first
/// occurrence.
fn lexicon_keywords(jd_text: &str) -> Vec<String> {
    let haystack = jd_text.to_lowercase();
    let mut found: Vec<(usize, &str)> = SKILL_LEXICON
        .iter()
        .filter_map(|&skill| find_term(&haystack, skill).map(|pos| (pos, skill)))
        .collect();
    found.sort_by_key(|&(pos, _)| pos);
    found.into_iter().map(|(_, s)| s.to_string()).collect()
}

/// Finds `term` in lowercased `haystack` at a word boundary, returning the
/// byte offset of the first such occurrence.
fn find_term(haystack: &str, term: &str) -> Option<usize> {
    let mut start = 0;
    while let Some(idx) = haystack[start..].find(term) {
        let abs = start + idx;
        let end = abs + term.len();
        let boundary_before = abs == 0
            || haystack[..abs]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
        let boundary_after = end >= haystack.len()
            || haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        if boundary_before && boundary_after {
            return Some(abs);
        }
        start = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        let keywords = normalize_keywords(vec![
            "  Python,  ".to_string(),
            "\"SQL\"".to_string(),
            "Machine   Learning".to_string(),
        ]);
        assert_eq!(keywords, vec!["python", "sql", "machine learning"]);
    }

    #[test]
    fn test_normalize_dedups_exact_preserving_order() {
        let keywords = normalize_keywords(vec![
            "Docker".to_string(),
            "python".to_string(),
            "docker".to_string(),
            "PYTHON".to_string(),
        ]);
        assert_eq!(keywords, vec!["docker", "python"]);
    }

    #[test]
    fn test_normalize_drops_empty_entries() {
        let keywords = normalize_keywords(vec!["  ".to_string(), "...".to_string()]);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_lexicon_orders_by_first_occurrence() {
        let jd = "We need Docker experience and strong Python skills. SQL is a plus.";
        assert_eq!(lexicon_keywords(jd), vec!["docker", "python", "sql"]);
    }

    #[test]
    fn test_lexicon_respects_word_boundaries() {
        // "javascript" must not produce a "java" hit
        let jd = "JavaScript developer wanted";
        let keywords = lexicon_keywords(jd);
        assert!(keywords.contains(&"javascript".to_string()));
        assert!(!keywords.contains(&"java".to_string()));
    }

    #[test]
    fn test_lexicon_matches_multi_word_phrases() {
        let jd = "Experience with machine learning pipelines required.";
        assert_eq!(lexicon_keywords(jd), vec!["machine learning"]);
    }

    #[test]
    fn test_lexicon_empty_jd_yields_no_keywords() {
        assert!(lexicon_keywords("").is_empty());
    }

    #[test]
    fn test_find_term_handles_symbol_suffixed_skills() {
        assert!(find_term("expert in c++ and more", "c++").is_some());
        assert!(find_term("c# services", "c#").is_some());
    }
}
