//! Shared chat gateway for the WizEdia backend.
//!
//! The crate hides the concrete LLM provider (Gemini, OpenAI or Ollama) behind
//! the [`ChatService`] trait. Handlers pass a user prompt, a context block and
//! a personality tag, and get back a [`ChatReply`] that is either a model
//! answer or a canned fallback when the provider is unavailable.

pub mod chat_service;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod personality;
pub mod services;
pub mod telemetry;

pub use chat_service::{ChatReply, ChatService, LlmChatService};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use health_service::{HealthService, HealthStatus};
pub use personality::Personality;
