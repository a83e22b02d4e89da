use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::screening::semantic::SemanticAnalyzer;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Session-scoped job/result storage. Nothing survives a restart.
    pub store: SessionStore,
    /// Used directly only for JD keyword extraction; resume analysis goes
    /// through `analyzer`.
    pub llm: LlmClient,
    /// Pluggable semantic analyzer. Default: ClaudeAnalyzer. Mocked in tests.
    pub analyzer: Arc<dyn SemanticAnalyzer>,
    pub config: Config,
}
