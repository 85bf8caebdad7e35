//! Ollama client for non-streaming generations.
//!
//! Talks to `POST {base}/api/generate` with a fixed context window and a
//! per-request token budget. Readiness is probed with `GET /api/version`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::ReplyGenerator;
use crate::config::ServerConfig;

/// Context window requested for every generation (tokens).
const CONTEXT_LENGTH: u32 = 8_192;

/// Conservative batch size for an 8K context.
const NUM_BATCH: u32 = 256;

/// Connection timeout towards Ollama.
const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Errors produced by the Ollama client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// Base URL could not be parsed.
    #[error("invalid ollama url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Ollama answered with a non-success status.
    #[error("ollama http status not ok: {0}")]
    HttpStatusNotOk(u16),
    /// The response had no `response` field.
    #[error("ollama http response malformed")]
    MalformedResponse,
    /// The model produced only whitespace.
    #[error("ollama returned an empty generation")]
    EmptyGeneration,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    num_predict: u32,
    num_batch: u32,
    num_thread: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    keep_alive: &'a str,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Async Ollama client bound to one model.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    keep_alive: String,
    num_predict: u32,
}

impl OllamaClient {
    /// Build a client from the server configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ServerConfig) -> Result<Self, LlmError> {
        let base_url = Url::parse(&config.ollama_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            keep_alive: config.keep_alive.clone(),
            num_predict: config.num_predict,
        })
    }

    /// Base URL of the Ollama runtime.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether Ollama answers `GET /api/version`.
    pub async fn is_ready(&self) -> bool {
        let Ok(url) = self.base_url.join("api/version") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("ollama not reachable: {e}");
                false
            }
        }
    }

    async fn post_generate(&self, prompt: &str) -> Result<GenerateResponse, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            keep_alive: &self.keep_alive,
            options: GenerateOptions {
                num_ctx: CONTEXT_LENGTH,
                num_predict: self.num_predict,
                num_batch: NUM_BATCH,
                num_thread: detect_num_thread(),
            },
        };

        let url = self.base_url.join("api/generate")?;
        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::HttpStatusNotOk(status.as_u16()));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|_| LlmError::MalformedResponse)
    }
}

#[async_trait]
impl ReplyGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let text = self
            .post_generate(prompt)
            .await?
            .response
            .ok_or(LlmError::MalformedResponse)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyGeneration);
        }
        Ok(text.to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn detect_num_thread() -> u32 {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .map_or(8, |v| u32::try_from(v).unwrap_or(u32::MAX))
}
