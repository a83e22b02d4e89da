use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Application configuration loaded from environment variables.
/// Built once at startup and passed by reference into components.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub scoring: ScoringConfig,
    /// Upper bound on concurrently running resume analyses. Sized to
    /// respect the semantic service's rate limits.
    pub max_concurrent_analyses: usize,
    pub semantic_timeout_secs: u64,
}

/// Scoring weights and verdict cut points. Tunable, never inline constants.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub hard_weight: f64,
    pub semantic_weight: f64,
    pub strong_fit_threshold: f64,
    pub moderate_fit_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hard_weight: 0.4,
            semantic_weight: 0.6,
            strong_fit_threshold: 75.0,
            moderate_fit_threshold: 50.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hard_weight < 0.0 || self.semantic_weight < 0.0 {
            bail!("scoring weights must be non-negative");
        }
        if self.hard_weight + self.semantic_weight == 0.0 {
            bail!("at least one scoring weight must be positive");
        }
        if self.strong_fit_threshold < self.moderate_fit_threshold {
            bail!("STRONG_FIT_THRESHOLD must be >= MODERATE_FIT_THRESHOLD");
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            hard_weight: env_parse("SCORE_HARD_WEIGHT", defaults.hard_weight)?,
            semantic_weight: env_parse("SCORE_SEMANTIC_WEIGHT", defaults.semantic_weight)?,
            strong_fit_threshold: env_parse("STRONG_FIT_THRESHOLD", defaults.strong_fit_threshold)?,
            moderate_fit_threshold: env_parse(
                "MODERATE_FIT_THRESHOLD",
                defaults.moderate_fit_threshold,
            )?,
        };
        scoring.validate()?;

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_parse("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scoring,
            max_concurrent_analyses: env_parse("MAX_CONCURRENT_ANALYSES", 4)?,
            semantic_timeout_secs: env_parse("SEMANTIC_TIMEOUT_SECS", 60)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let scoring = ScoringConfig {
            hard_weight: -0.1,
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let scoring = ScoringConfig {
            hard_weight: 0.0,
            semantic_weight: 0.0,
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let scoring = ScoringConfig {
            strong_fit_threshold: 40.0,
            moderate_fit_threshold: 50.0,
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
    }
}
