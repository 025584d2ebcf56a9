use std::sync::Arc;

use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `GroqClient` in production; tests swap in a scripted provider.
    pub llm: Arc<dyn LlmProvider>,
}
