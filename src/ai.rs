use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SentimentConfig;

/// Marker the scoring API puts in `code` for a successful call
const SUCCESS_CODE: i64 = 200;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("LLM API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            BackendError::Timeout
        } else if let Some(status) = error.status() {
            BackendError::HttpStatus(status.as_u16())
        } else if error.is_decode() {
            BackendError::InvalidResponse(error.to_string())
        } else {
            BackendError::Network(error.to_string())
        }
    }
}

// Extensible text-scoring backend: one prompt in, one text reply out
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    enable_sync_mode: bool,
    model: &'a str,
    priority: &'a str,
    prompt: &'a str,
    reasoning: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    code: Option<i64>,
    message: Option<String>,
    data: Option<CompletionData>,
}

#[derive(Debug, Deserialize)]
struct CompletionData {
    #[serde(default)]
    outputs: Vec<String>,
}

/// Pull the reply text out of a response envelope.
///
/// Only `code == 200` with at least one output counts as success; every other
/// shape becomes an error carrying the envelope's message when present.
pub fn extract_output(body: &str) -> Result<String, BackendError> {
    let envelope: CompletionEnvelope = serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

    if envelope.code == Some(SUCCESS_CODE) {
        if let Some(output) = envelope.data.and_then(|d| d.outputs.into_iter().next()) {
            return Ok(output);
        }
    }

    Err(BackendError::Api(
        envelope.message.unwrap_or_else(|| "Unknown error".to_string()),
    ))
}

// WaveSpeed AI any-llm endpoint over plain reqwest
pub struct WaveSpeedBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl WaveSpeedBackend {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        if api_key.trim().is_empty() {
            return Err(BackendError::InvalidApiKey("API key is required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    pub fn from_config(config: &SentimentConfig) -> Result<Self, BackendError> {
        Self::new(
            config.api_key.clone(),
            config.api_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout),
        )
    }
}

#[async_trait]
impl AiBackend for WaveSpeedBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let request = CompletionRequest {
            enable_sync_mode: true,
            model: &self.model,
            priority: "latency",
            prompt,
            reasoning: false,
        };

        debug!("Posting {} prompt chars to {}", prompt.len(), self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        extract_output(&body)
    }

    fn name(&self) -> &'static str {
        "WaveSpeed AI"
    }
}
