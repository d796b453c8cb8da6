use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{Result, validate_http_endpoint, validate_range_f32},
};

/// Configuration for a chat model invocation.
///
/// # Fields
///
/// - `provider`: which backend to call (Gemini, OpenAI, Ollama).
/// - `model`: model identifier (e.g. `"gemini-2.0-flash"`).
/// - `endpoint`: API base URL, without the operation path.
/// - `api_key`: key for providers that require one.
/// - `max_tokens`: maximum number of tokens to generate.
/// - `temperature`, `top_p`, `top_k`: sampling knobs, forwarded when set.
/// - `timeout_secs`: per-request timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-2.0-flash".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
///     api_key: Some("key".to_string()),
///     max_tokens: Some(1024),
///     temperature: Some(0.7),
///     top_p: Some(0.95),
///     top_k: Some(40),
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// Optional API key.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Top-k sampling parameter (Gemini and Ollama only).
    pub top_k: Option<u32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Validates endpoint scheme, model name and sampling ranges.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(crate::error_handler::ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", self.endpoint.trim())?;
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Endpoint without trailing slashes, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
