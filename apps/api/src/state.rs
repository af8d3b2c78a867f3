use std::sync::Arc;

use crate::contact::Mailer;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text generator. Production: GeminiClient; tests swap in a
    /// scripted fake.
    pub llm: Arc<dyn TextGenerator>,
    pub mailer: Mailer,
}
