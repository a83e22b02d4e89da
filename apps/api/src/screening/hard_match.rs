//! Deterministic keyword-overlap scoring.
//!
//! Pure functions only; no I/O, no LLM calls. Keywords are assumed to be
//! pre-normalized (lowercase) by the keyword extractor.

use std::collections::HashSet;

use crate::models::candidate::HardScore;

/// Scores a resume against the JD keyword set.
///
/// `value = 100 * |matched| / |keywords|`, floor division; 0 for an empty
/// keyword set. `matched_keywords` and `missing_keywords` partition the
/// keyword set exactly, both in keyword-set order.
pub fn score(keywords: &[String], resume_text: &str) -> HardScore {
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    if keywords.is_empty() {
        return HardScore {
            value: 0,
            matched_keywords: matched,
            missing_keywords: missing,
        };
    }

    let haystack = resume_text.to_lowercase();
    let tokens: HashSet<&str> = haystack
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for keyword in keywords {
        let hit = if keyword.chars().all(|c| c.is_alphanumeric()) {
            tokens.contains(keyword.as_str())
        } else {
            // Phrases and symbol-bearing keywords ("machine learning", "c++")
            // match as boundary-delimited substrings.
            contains_term(&haystack, keyword)
        };
        if hit {
            matched.push(keyword.clone());
        } else {
            missing.push(keyword.clone());
        }
    }

    let value = (matched.len() * 100 / keywords.len()) as u32;
    HardScore {
        value,
        matched_keywords: matched,
        missing_keywords: missing,
    }
}

fn contains_term(haystack: &str, term: &str) -> bool {
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
            return true;
        }
        start = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_of_three_keywords_scores_66() {
        let keywords = kws(&["python", "sql", "docker"]);
        let resume = "Built data platforms in Python with heavy SQL reporting.";
        let score = score(&keywords, resume);
        assert_eq!(score.value, 66);
        assert_eq!(score.matched_keywords, kws(&["python", "sql"]));
        assert_eq!(score.missing_keywords, kws(&["docker"]));
    }

    #[test]
    fn test_matched_and_missing_partition_keyword_set() {
        let keywords = kws(&["rust", "kafka", "grpc", "sql"]);
        let score = score(&keywords, "Rust services speaking gRPC");
        let mut all: Vec<String> = score.matched_keywords.clone();
        all.extend(score.missing_keywords.clone());
        all.sort();
        let mut expected = keywords.clone();
        expected.sort();
        assert_eq!(all, expected);
        for kw in &score.matched_keywords {
            assert!(!score.missing_keywords.contains(kw));
        }
    }

    #[test]
    fn test_empty_keyword_set_scores_zero() {
        let score = score(&[], "any resume text at all");
        assert_eq!(score.value, 0);
        assert!(score.matched_keywords.is_empty());
        assert!(score.missing_keywords.is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let score = score(&kws(&["python"]), "PYTHON enthusiast");
        assert_eq!(score.value, 100);
    }

    #[test]
    fn test_token_match_respects_word_boundaries() {
        // "java" must not match inside "javascript"
        let score = score(&kws(&["java"]), "Senior JavaScript engineer");
        assert_eq!(score.value, 0);
        assert_eq!(score.missing_keywords, kws(&["java"]));
    }

    #[test]
    fn test_phrase_keyword_matches_as_substring() {
        let score = score(
            &kws(&["machine learning"]),
            "Shipped machine learning models to production",
        );
        assert_eq!(score.value, 100);
    }

    #[test]
    fn test_symbol_keyword_matches_with_boundaries() {
        let score = score(&kws(&["c++"]), "10 years of C++ experience");
        assert_eq!(score.value, 100);
    }

    #[test]
    fn test_all_missing_scores_zero() {
        let score = score(&kws(&["haskell", "erlang"]), "Java and Python only");
        assert_eq!(score.value, 0);
        assert_eq!(score.missing_keywords, kws(&["haskell", "erlang"]));
    }

    #[test]
    fn test_idempotent_for_same_input() {
        let keywords = kws(&["python", "docker"]);
        let resume = "Python, Docker, and more Python";
        let a = score(&keywords, resume);
        let b = score(&keywords, resume);
        assert_eq!(a.value, b.value);
        assert_eq!(a.matched_keywords, b.matched_keywords);
        assert_eq!(a.missing_keywords, b.missing_keywords);
    }
}
