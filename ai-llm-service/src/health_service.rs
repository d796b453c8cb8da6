//! Health probes for the configured chat provider.
//!
//! - Gemini: `GET {endpoint}/models/{model}` with the API key header
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth (best-effort model existence check)
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "gemini").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        debug!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks the provider described by `cfg`. Never returns an error.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.base_url();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            warn!(
                provider = %cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::new(cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Gemini => self.try_probe_gemini(cfg).await,
            LlmProvider::OpenAI => self.try_probe_openai(cfg).await,
            LlmProvider::Ollama => self.try_probe_ollama(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok((ok, message)) => {
                info!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    ok,
                    latency_ms = latency,
                    "health probe completed"
                );
                HealthStatus::new(cfg, ok, latency, message)
            }
            Err(err) => {
                warn!(
                    provider = %cfg.provider,
                    model = %cfg.model,
                    latency_ms = latency,
                    error = %err,
                    "health probe failed"
                );
                HealthStatus::new(cfg, false, latency, err.to_string())
            }
        }
    }

    /// Gemini probe: model metadata lookup. A 2xx means the key and model are valid.
    async fn try_probe_gemini(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/models/{}", cfg.base_url(), cfg.model);
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing Gemini API key".into()))?;

        let req = self.client.get(&url).header("x-goog-api-key", key);
        self.send(cfg, &url, req).await?;
        Ok((true, "Gemini is healthy; model is available".into()))
    }

    /// OpenAI probe: `GET /v1/models`, then best-effort model lookup.
    async fn try_probe_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/v1/models", cfg.base_url());
        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing OpenAI API key".into()))?;

        let req = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {key}"));
        let resp = self.send(cfg, &url, req).await?;

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        Ok(match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => {
                (true, "OpenAI is healthy; model is available".into())
            }
            Ok(_) => (false, "OpenAI is up, but model not found in /v1/models".into()),
            Err(e) => (true, format!("OpenAI is reachable; failed to decode /v1/models: {e}")),
        })
    }

    /// Ollama probe: `GET /api/tags`, then best-effort model lookup.
    async fn try_probe_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/api/tags", cfg.base_url());
        let req = self.client.get(&url);
        let resp = self.send(cfg, &url, req).await?;

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        Ok(match resp.json::<Tags>().await {
            Ok(Tags { models: Some(models) }) if models.iter().any(|m| m.name == cfg.model) => {
                (true, "Ollama is healthy; model is available".into())
            }
            Ok(Tags { models: Some(_) }) => {
                (false, "Ollama is up, but model not found in /api/tags".into())
            }
            Ok(Tags { models: None }) => {
                (true, "Ollama is healthy; tags response without `models` field".into())
            }
            Err(e) => (true, format!("Ollama is reachable; failed to decode /api/tags: {e}")),
        })
    }

    /// Sends a probe and turns non-2xx statuses into [`HealthError::HttpStatus`].
    async fn send(
        &self,
        cfg: &LlmModelConfig,
        url: &str,
        req: RequestBuilder,
    ) -> Result<reqwest::Response, AiLlmError> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        debug!(provider = %cfg.provider, "GET {}", url);
        let resp = req.timeout(timeout).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                provider = %cfg.provider,
                %url,
                %status,
                %snippet,
                "health probe returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            })
            .into());
        }

        Ok(resp)
    }
}
