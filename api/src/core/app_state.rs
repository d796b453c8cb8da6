use std::sync::Arc;

use ai_llm_service::ChatService;

use crate::core::auth::{AnonymousVerifier, TokenVerifier};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// LLM chat gateway.
    pub chat: Arc<dyn ChatService>,
    /// Identity check for optional auth.
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatService>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { chat, verifier }
    }

    /// State without identity verification.
    pub fn anonymous(chat: Arc<dyn ChatService>) -> Self {
        Self::new(chat, Arc::new(AnonymousVerifier))
    }
}
