//! Chat gateway shared by all HTTP handlers.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds exactly one provider client at startup (Gemini, OpenAI or Ollama),
//!   or runs offline when no provider is configured.
//! - Unreachable or failing upstreams yield an unsuccessful [`ChatReply`]
//!   carrying the personality's fallback text instead of an error.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatService, LlmChatService, Personality};
//! use ai_llm_service::config::default_config::config_from_env;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc: Arc<dyn ChatService> = Arc::new(LlmChatService::new(config_from_env()?)?);
//! let reply = svc
//!     .chat("What is entropy?", "Answer at beginner level.", Personality::Hermione)
//!     .await?;
//! println!("{} ({:?})", reply.response, reply.model);
//! # Ok(()) }
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    personality::Personality,
    services::{
        gemini_service::GeminiService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

/// Model tag reported when the reply is a canned fallback.
pub const FALLBACK_MODEL: &str = "fallback";

/// Outcome of one chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// `false` when the provider was unavailable and `response` is a fallback.
    pub success: bool,
    /// Model answer, or the personality fallback text.
    pub response: String,
    /// Model that produced the answer, when known.
    pub model: Option<String>,
    /// Personality the reply was produced for.
    pub personality: Personality,
}

impl ChatReply {
    pub fn answered(
        response: impl Into<String>,
        model: impl Into<String>,
        personality: Personality,
    ) -> Self {
        Self {
            success: true,
            response: response.into(),
            model: Some(model.into()),
            personality,
        }
    }

    /// Unsuccessful reply carrying the personality's fallback text.
    pub fn unavailable(personality: Personality) -> Self {
        Self {
            success: false,
            response: personality.fallback_response().to_string(),
            model: Some(FALLBACK_MODEL.to_string()),
            personality,
        }
    }
}

/// LLM-backed chat completion.
///
/// `prompt` is the user's text, `context` carries task instructions, and
/// `personality` selects the system prompt.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat(
        &self,
        prompt: &str,
        context: &str,
        personality: Personality,
    ) -> Result<ChatReply, AiLlmError>;

    /// Health snapshot of the underlying provider, `None` when offline.
    async fn health(&self) -> Option<HealthStatus> {
        None
    }
}

/// Concrete provider client behind [`LlmChatService`].
#[derive(Debug)]
enum Backend {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

impl Backend {
    fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Gemini => Backend::Gemini(GeminiService::new(cfg)?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => Backend::Ollama(OllamaService::new(cfg)?),
        })
    }

    async fn generate(&self, prompt: &str, system: &str) -> Result<String, AiLlmError> {
        match self {
            Backend::Gemini(cli) => cli.generate(prompt, Some(system)).await,
            Backend::OpenAI(cli) => cli.generate(prompt, Some(system)).await,
            Backend::Ollama(cli) => cli.generate(prompt, Some(system)).await,
        }
    }
}

/// Default [`ChatService`] talking to one configured provider.
pub struct LlmChatService {
    cfg: Option<LlmModelConfig>,
    backend: Option<Backend>,
    health: HealthService,
}

impl LlmChatService {
    /// Creates the gateway. `None` starts it offline.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider client cannot be built.
    pub fn new(cfg: Option<LlmModelConfig>) -> Result<Self, AiLlmError> {
        let backend = cfg.clone().map(Backend::new).transpose()?;
        match &cfg {
            Some(c) => info!(provider = %c.provider, model = %c.model, "chat service ready"),
            None => warn!("chat service started offline; all chats will use fallbacks"),
        }
        Ok(Self {
            cfg,
            backend,
            health: HealthService::new(Some(10))?,
        })
    }

    /// The user turn sent to the model.
    pub fn compose_user_turn(prompt: &str, context: &str) -> String {
        if context.trim().is_empty() {
            format!("User: {prompt}\n\nAssistant:")
        } else {
            format!("Context: {context}\n\nUser: {prompt}\n\nAssistant:")
        }
    }
}

#[async_trait]
impl ChatService for LlmChatService {
    async fn chat(
        &self,
        prompt: &str,
        context: &str,
        personality: Personality,
    ) -> Result<ChatReply, AiLlmError> {
        let (Some(backend), Some(cfg)) = (&self.backend, &self.cfg) else {
            warn!(%personality, "no chat provider configured; returning fallback");
            return Ok(ChatReply::unavailable(personality));
        };

        let user_turn = Self::compose_user_turn(prompt, context);
        match backend.generate(&user_turn, personality.system_prompt()).await {
            Ok(text) => Ok(ChatReply::answered(text, cfg.model.clone(), personality)),
            Err(e) if e.is_unavailable() => {
                warn!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    %personality,
                    error = %e,
                    "chat provider unavailable; returning fallback"
                );
                Ok(ChatReply::unavailable(personality))
            }
            Err(e) => Err(e),
        }
    }

    async fn health(&self) -> Option<HealthStatus> {
        match &self.cfg {
            Some(cfg) => Some(self.health.check(cfg).await),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_turn_embeds_context_and_prompt() {
        let turn = LlmChatService::compose_user_turn("What is a derivative?", "Be precise.");
        assert_eq!(
            turn,
            "Context: Be precise.\n\nUser: What is a derivative?\n\nAssistant:"
        );
    }

    #[test]
    fn user_turn_without_context() {
        assert_eq!(
            LlmChatService::compose_user_turn("hi", "  "),
            "User: hi\n\nAssistant:"
        );
    }

    #[tokio::test]
    async fn offline_service_returns_unsuccessful_fallback() {
        let svc = LlmChatService::new(None).unwrap();
        let reply = svc.chat("q", "ctx", Personality::Hermione).await.unwrap();
        assert!(!reply.success);
        assert_eq!(reply.response, Personality::Hermione.fallback_response());
        assert_eq!(reply.model.as_deref(), Some(FALLBACK_MODEL));
        assert!(svc.health().await.is_none());
    }

    #[tokio::test]
    async fn unreachable_provider_degrades_to_fallback() {
        // Port 9 (discard) on loopback refuses connections in test sandboxes.
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3".into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            max_tokens: Some(16),
            temperature: None,
            top_p: None,
            top_k: None,
            timeout_secs: Some(2),
        };
        let svc = LlmChatService::new(Some(cfg)).unwrap();
        let reply = svc.chat("q", "", Personality::Professor).await.unwrap();
        assert!(!reply.success);
        assert_eq!(reply.personality, Personality::Professor);
    }
}
