// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions and embeddings APIs.
//!
//! Completion calls retry transient transport failures (timeout,
//! connect) with exponential backoff. An HTTP 429 on the default model
//! is not retried; instead the configured fallback model is tried once.
//! Embedding calls are single-shot with a short timeout: a slow
//! embedding is worth less than a fast reply without one.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use mnemo_config::model::OpenRouterConfig;
use mnemo_core::MnemoError;

use crate::types::{
    ApiErrorResponse, ApiMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
};

/// Base URL for the OpenRouter API.
const API_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Completion attempts per model (initial call plus transient retries).
const MAX_ATTEMPTS: u32 = 3;

/// Initial backoff delay; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Backoff ceiling.
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// How a single API call failed, for the retry/fallback policy.
enum CallError {
    /// Transport-level failure worth retrying on the same model.
    Transient(MnemoError),
    /// HTTP 429; the caller may switch to the fallback model.
    RateLimited(MnemoError),
    /// Anything else; no retry will help.
    Fatal(MnemoError),
}

impl CallError {
    fn into_inner(self) -> MnemoError {
        match self {
            CallError::Transient(e) | CallError::RateLimited(e) | CallError::Fatal(e) => e,
        }
    }
}

/// HTTP client for OpenRouter API communication.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    default_model: String,
    fallback_model: String,
    max_tokens: u32,
    temperature: f64,
    request_timeout: Duration,
    embedding_model: String,
    embedding_timeout: Duration,
}

impl OpenRouterClient {
    /// Creates a new OpenRouter client from configuration.
    ///
    /// Fails if the API key is absent or not a valid header value.
    pub fn new(config: &OpenRouterConfig) -> Result<Self, MnemoError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| MnemoError::Config("openrouter.api_key is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| MnemoError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(&config.referer)
                .map_err(|e| MnemoError::Config(format!("invalid referer header value: {e}")))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(&config.app_title)
                .map_err(|e| MnemoError::Config(format!("invalid title header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MnemoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            default_model: config.default_model.clone(),
            fallback_model: config.fallback_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            embedding_model: config.embedding_model.clone(),
            embedding_timeout: Duration::from_secs(config.embedding_timeout_secs),
        })
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Generates a completion for `prompt`.
    ///
    /// Tries the requested (or default) model with transient retries;
    /// on HTTP 429 the fallback model is tried once with its own
    /// transient retries. A rate limit on the fallback as well is final.
    pub async fn complete_text(
        &self,
        prompt: &str,
        model: Option<&str>,
        temperature: Option<f64>,
    ) -> Result<String, MnemoError> {
        let model = model.unwrap_or(&self.default_model);
        let temperature = temperature.unwrap_or(self.temperature);

        match self.completion_with_retries(model, prompt, temperature).await {
            Ok(text) => Ok(text),
            Err(CallError::RateLimited(_)) if model != self.fallback_model => {
                warn!(
                    model,
                    fallback = %self.fallback_model,
                    "model rate limited, trying fallback once"
                );
                self.completion_with_retries(&self.fallback_model, prompt, temperature)
                    .await
                    .map_err(CallError::into_inner)
            }
            Err(e) => Err(e.into_inner()),
        }
    }

    /// Generates an embedding for `text`. Single attempt, short timeout.
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .timeout(self.embedding_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MnemoError::Timeout {
                        duration: self.embedding_timeout,
                    }
                } else {
                    MnemoError::Provider {
                        message: format!("embedding request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| MnemoError::Provider {
            message: format!("failed to read embedding response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let parsed: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|e| MnemoError::Provider {
                message: format!("failed to parse embedding response: {e}"),
                source: Some(Box::new(e)),
            })?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MnemoError::Provider {
                message: "embedding response contained no data".to_string(),
                source: None,
            })
    }

    /// Attempt loop for one model: retries transient transport errors
    /// with exponential backoff, classifies HTTP failures.
    async fn completion_with_retries(
        &self,
        model: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, CallError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                warn!(attempt, delay_secs = backoff.as_secs(), "retrying after transient error");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }

            match self.completion_once(model, prompt, temperature).await {
                Ok(text) => return Ok(text),
                Err(CallError::Transient(e)) => {
                    last_error = Some(CallError::Transient(e));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CallError::Fatal(MnemoError::Provider {
                message: "completion failed after retries".to_string(),
                source: None,
            })
        }))
    }

    async fn completion_once(
        &self,
        model: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, CallError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    CallError::Transient(MnemoError::Provider {
                        message: format!("transport error: {e}"),
                        source: Some(Box::new(e)),
                    })
                } else {
                    CallError::Fatal(MnemoError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    })
                }
            })?;

        let status = response.status();
        debug!(status = %status, model, "completion response received");

        let body = response.text().await.map_err(|e| {
            CallError::Fatal(MnemoError::Provider {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })
        })?;

        if status.as_u16() == 429 {
            return Err(CallError::RateLimited(api_error(status, &body)));
        }
        if !status.is_success() {
            return Err(CallError::Fatal(api_error(status, &body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            CallError::Fatal(MnemoError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                CallError::Fatal(MnemoError::Provider {
                    message: "completion response contained no choices".to_string(),
                    source: None,
                })
            })
    }
}

/// Build a provider error from an API failure body, preferring the
/// structured error envelope when it parses.
fn api_error(status: reqwest::StatusCode, body: &str) -> MnemoError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) => format!("OpenRouter API error ({status}): {}", envelope.error.message),
        Err(_) => format!("API returned {status}: {body}"),
    };
    MnemoError::Provider {
        message,
        source: None,
    }
}
