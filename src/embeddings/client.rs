//! Embedding API clients for various providers

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use futures::stream::{
    self,
};
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::FeedbackError;
use crate::errors::Result;

/// Concurrent requests when a provider has no batch endpoint
const OLLAMA_CONCURRENCY: usize = 8;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI` (or compatible) embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

impl FromStr for EmbeddingProvider {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(FeedbackError::ConfigError(format!(
                "unknown embedding provider: {other}"
            ))),
        }
    }
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
    timeout: Duration,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(config: EmbeddingConfig, timeout: Duration) -> Result<Self> {
        if config.provider == EmbeddingProvider::OpenAI && config.api_key.is_none() {
            return Err(FeedbackError::ConfigError(
                "OpenAI API key not provided (set embeddings.api_key or OPENAI_API_KEY)"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FeedbackError::EmbeddingError(e.to_string()))?;

        Ok(Self {
            provider: config.provider,
            model: config.model,
            endpoint: config.endpoint,
            api_key: config.api_key,
            dimension: config.dimension,
            timeout,
            client,
        })
    }

    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        Self::new(
            EmbeddingConfig::from_app_config(config)?,
            config.embedding_timeout(),
        )
    }

    /// Dimension the configured model is expected to return
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn map_http_error(&self, e: &reqwest::Error) -> FeedbackError {
        if e.is_timeout() {
            FeedbackError::Timeout {
                operation: "embedding",
                seconds: self.timeout.as_secs(),
            }
        } else {
            FeedbackError::EmbeddingError(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response, provider: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(FeedbackError::EmbeddingError(format!(
            "{provider} API error ({status}): {error_text}"
        )))
    }

    /// Generate embeddings using an `OpenAI`-compatible API
    async fn generate_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            FeedbackError::ConfigError("OpenAI API key not provided".to_string())
        })?;

        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {} ({} items)", url, texts.len());

        let request = OpenAIRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_http_error(&e))?;
        let response = Self::check_status(response, "OpenAI").await?;

        let mut result: OpenAIResponse = response.json().await.map_err(|e| {
            FeedbackError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        if result.data.len() != texts.len() {
            return Err(FeedbackError::EmbeddingError(format!(
                "requested {} embeddings, received {}",
                texts.len(),
                result.data.len()
            )));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_http_error(&e))?;
        let response = Self::check_status(response, "Ollama").await?;

        let result: OllamaResponse = response.json().await.map_err(|e| {
            FeedbackError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = match self.provider {
            EmbeddingProvider::OpenAI => self
                .generate_openai(&[text])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    FeedbackError::EmbeddingError("No embedding in response".to_string())
                })?,
            EmbeddingProvider::Ollama => self.generate_ollama(text).await?,
        };

        if embedding.is_empty() {
            return Err(FeedbackError::EmbeddingError(
                "provider returned an empty embedding".to_string(),
            ));
        }
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::OpenAI => {
                let mut embeddings = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(MAX_BATCH_SIZE) {
                    let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
                    embeddings.extend(self.generate_openai(&refs).await?);
                }
                Ok(embeddings)
            }
            EmbeddingProvider::Ollama => {
                // Ollama doesn't support batch; `buffered` keeps input order
                let results: Vec<Result<Vec<f32>>> = stream::iter(texts.to_vec())
                    .map(|text| async move { self.generate_ollama(&text).await })
                    .buffered(OLLAMA_CONCURRENCY)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
        }
    }
}
