//! Abstractions for generating abstractive summaries of text chunks.
//!
//! Two providers are supported. The default targets a Hugging Face style inference endpoint that
//! hosts a seq2seq summarization model (`facebook/bart-large-cnn` unless configured otherwise) and
//! accepts the length bounds natively. The Ollama adapter prompts a local instruction model and
//! maps the bounds onto generation options.

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be constructed, reached, or has no such model.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Generation bounds applied to every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Upper bound on the summary length, in model tokens.
    pub max_length: usize,
    /// Lower bound on the summary length, in model tokens.
    pub min_length: usize,
    /// Whether sampling is allowed; disabled means deterministic decoding.
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 50,
            do_sample: false,
        }
    }
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Chunk of document text to summarize.
    pub text: String,
    /// Length bounds and decoding mode.
    pub params: GenerationParams,
}

/// Interface implemented by abstractive summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Summarize one chunk of text.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client selected by configuration.
///
/// The handle is meant to be constructed once at startup and shared by every request.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Arc<dyn SummarizationClient>, SummarizationClientError> {
    let http = Client::builder()
        .user_agent(concat!("pdf-summarizer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to construct HTTP client: {error}"
            ))
        })?;

    tracing::info!(
        provider = ?config.summarization_provider,
        model = %config.summarization_model,
        "Summarization client initialized"
    );

    Ok(match config.summarization_provider {
        SummarizationProvider::HuggingFace => Arc::new(HuggingFaceSummarizationClient {
            http,
            base_url: config.huggingface_api_url.clone(),
            model: config.summarization_model.clone(),
            api_token: config.huggingface_api_token.clone(),
        }),
        SummarizationProvider::Ollama => Arc::new(OllamaSummarizationClient {
            http,
            base_url: config.ollama_url.clone(),
            model: config.summarization_model.clone(),
        }),
    })
}

struct HuggingFaceSummarizationClient {
    http: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizationClient {
    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[derive(Debug, Deserialize)]
struct HuggingFaceSummary {
    summary_text: String,
}

#[async_trait]
impl SummarizationClient for HuggingFaceSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let GenerationParams {
            max_length,
            min_length,
            do_sample,
        } = request.params;
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": max_length,
                "min_length": min_length,
                "do_sample": do_sample,
            },
            "options": {
                "wait_for_model": true,
            }
        });

        let mut builder = self.http.post(self.endpoint()).json(&payload);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to reach inference endpoint at {}: {error}",
                self.base_url
            ))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "model endpoint {} returned {status}: {body}",
                self.endpoint()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "inference endpoint returned {status}: {body}"
            )));
        }

        let results: Vec<HuggingFaceSummary> = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode summarization response: {error}"
            ))
        })?;

        results
            .into_iter()
            .next()
            .map(|result| result.summary_text)
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse(
                    "summarization response contained no results".into(),
                )
            })
    }
}

struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummarizationClient {
    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(text: &str, params: GenerationParams) -> String {
    format!(
        "Summarize the following text as a single factual paragraph. Use between {} and {} words. \
         Return only the summary.\n\n{text}",
        params.min_length, params.max_length
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let params = request.params;
        let mut options = json!({ "num_predict": params.max_length });
        if !params.do_sample {
            // Greedy decoding with a pinned seed keeps repeated runs identical.
            options["temperature"] = json!(0.0);
            options["seed"] = json!(0);
        }
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request.text, params),
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response)
    }
}
