//! Chat model config loaded from environment variables.
//!
//! The provider is chosen by `LLM_KIND` (`gemini` when unset). Each provider
//! has its own set of variables:
//!
//! - Gemini: `GEMINI_API_KEY` (required), `GEMINI_MODEL`, `GEMINI_URL`
//! - OpenAI: `OPENAI_API_KEY` (required), `OPENAI_MODEL`, `OPENAI_URL`
//! - Ollama: `OLLAMA_URL` or `OLLAMA_PORT` (required), `OLLAMA_MODEL` (required)
//!
//! Common: `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`.
//!
//! [`config_from_env`] (and [`config_from_lookup`]) distinguishes a *missing*
//! provider (required variable absent, `Ok(None)`) from a *broken* one
//! (malformed value, `Err`). The
//! former lets the service start in offline mode.

use std::str::FromStr;

use tracing::warn;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, validate_http_endpoint},
};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.95;
const DEFAULT_TOP_K: u32 = 40;

/// Loads the chat model config selected by `LLM_KIND`.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::InvalidFormat`] for malformed values
///
/// Returns `Ok(None)` when a variable required by the selected provider is absent.
pub fn config_from_env() -> Result<Option<LlmModelConfig>, AiLlmError> {
    config_from_lookup(|k| std::env::var(k).ok())
}

/// Same as [`config_from_env`] with a custom variable source.
pub fn config_from_lookup<F>(get: F) -> Result<Option<LlmModelConfig>, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let vars = Vars(get);
    let provider = match vars.opt("LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let loaded = match provider {
        LlmProvider::Gemini => config_gemini(&vars),
        LlmProvider::OpenAI => config_openai(&vars),
        LlmProvider::Ollama => config_ollama(&vars),
    };

    match loaded {
        Ok(cfg) => {
            cfg.validate()?;
            Ok(Some(cfg))
        }
        Err(AiLlmError::Config(ConfigError::MissingVar(var))) => {
            warn!(%provider, missing = var, "chat provider not configured; running offline");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Variable source; empty or whitespace-only values count as unset.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn opt(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn must(&self, name: &'static str) -> Result<String, AiLlmError> {
        self.opt(name)
            .ok_or_else(|| ConfigError::MissingVar(name).into())
    }

    fn number<T: FromStr>(
        &self,
        name: &'static str,
        reason: &'static str,
    ) -> Result<Option<T>, AiLlmError> {
        match self.opt(name) {
            Some(v) => v
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber { var: name, reason }.into()),
            None => Ok(None),
        }
    }

    fn max_tokens(&self) -> Result<u32, AiLlmError> {
        Ok(self
            .number("LLM_MAX_TOKENS", "expected u32")?
            .unwrap_or(DEFAULT_MAX_TOKENS))
    }

    fn timeout_secs(&self) -> Result<u64, AiLlmError> {
        Ok(self
            .number("LLM_TIMEOUT_SECS", "expected u64")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Gemini `generateContent` config.
///
/// # Defaults
/// - `temperature = 0.7`, `top_k = 40`, `top_p = 0.95`, `max_tokens = 1024`
fn config_gemini<F>(vars: &Vars<F>) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = vars.must("GEMINI_API_KEY")?;
    let endpoint = vars
        .opt("GEMINI_URL")
        .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
    validate_http_endpoint("GEMINI_URL", endpoint.trim())?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: vars
            .opt("GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(vars.max_tokens()?),
        temperature: Some(DEFAULT_TEMPERATURE),
        top_p: Some(DEFAULT_TOP_P),
        top_k: Some(DEFAULT_TOP_K),
        timeout_secs: Some(vars.timeout_secs()?),
    })
}

/// OpenAI chat completions config. `top_k` is not supported by the API.
fn config_openai<F>(vars: &Vars<F>) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = vars.must("OPENAI_API_KEY")?;
    let endpoint = vars
        .opt("OPENAI_URL")
        .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
    validate_http_endpoint("OPENAI_URL", endpoint.trim())?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: vars
            .opt("OPENAI_MODEL")
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(vars.max_tokens()?),
        temperature: Some(DEFAULT_TEMPERATURE),
        top_p: Some(DEFAULT_TOP_P),
        top_k: None,
        timeout_secs: Some(vars.timeout_secs()?),
    })
}

/// Local Ollama config.
fn config_ollama<F>(vars: &Vars<F>) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = ollama_endpoint(vars)?;
    let model = vars.must("OLLAMA_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: Some(vars.max_tokens()?),
        temperature: Some(DEFAULT_TEMPERATURE),
        top_p: Some(DEFAULT_TOP_P),
        top_k: Some(DEFAULT_TOP_K),
        timeout_secs: Some(vars.timeout_secs()?),
    })
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(vars: &Vars<F>) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = vars.opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", url.trim())?;
        return Ok(url);
    }
    if let Some(port) = vars.number::<u16>("OLLAMA_PORT", "expected u16 (1..=65535)")? {
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}
