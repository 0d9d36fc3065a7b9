//! Chat completion clients for various providers

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::CompletionClient;
use crate::config::AppConfig;
use crate::errors::FeedbackError;
use crate::errors::Result;

/// Supported chat completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// `OpenAI` (or compatible) `/chat/completions`
    OpenAI,
    /// Ollama `/api/chat`
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(FeedbackError::ConfigError(format!(
                "unknown llm provider: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// HTTP client for a single-turn chat completion
pub struct LlmClient {
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    timeout: Duration,
    client: Client,
}

impl LlmClient {
    pub fn new(
        provider: LlmProvider,
        endpoint: String,
        api_key: Option<String>,
        model: String,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        if provider == LlmProvider::OpenAI && api_key.is_none() {
            return Err(FeedbackError::ConfigError(
                "OpenAI API key not provided (set llm.llm_key or OPENAI_API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedbackError::CompletionError(e.to_string()))?;

        Ok(Self {
            provider,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature,
            timeout,
            client,
        })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let provider: LlmProvider = config.llm.provider.parse()?;
        let api_key = match provider {
            LlmProvider::OpenAI => config.llm_key(),
            LlmProvider::Ollama => None,
        };

        Self::new(
            provider,
            config.llm_endpoint().to_string(),
            api_key,
            config.llm_model().to_string(),
            config.llm.temperature,
            config.completion_timeout(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_http_error(&self, e: &reqwest::Error) -> FeedbackError {
        if e.is_timeout() {
            FeedbackError::Timeout {
                operation: "completion",
                seconds: self.timeout.as_secs(),
            }
        } else {
            FeedbackError::CompletionError(e.to_string())
        }
    }

    async fn send(&self, url: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await.map_err(|e| self.map_http_error(&e))?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FeedbackError::CompletionError(format!(
                "LLM API error ({status}): {error_text}"
            )));
        }
        Ok(response)
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_none() {
            return Err(FeedbackError::ConfigError(
                "OpenAI API key not provided".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ReplyMessage,
        }

        #[derive(Deserialize)]
        struct ReplyMessage {
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} (model {})", url, self.model);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response: ChatResponse = self
            .send(&url, &request)
            .await?
            .json()
            .await
            .map_err(|e| FeedbackError::CompletionError(format!("Failed to parse response: {e}")))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| FeedbackError::CompletionError("No content in response".to_string()))
    }

    async fn complete_ollama(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct OllamaOptions {
            temperature: f32,
        }

        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            message: OllamaMessage,
        }

        #[derive(Deserialize)]
        struct OllamaMessage {
            content: String,
        }

        let url = format!("{}/api/chat", self.endpoint);
        debug!("Calling Ollama chat API: {} (model {})", url, self.model);

        let request = OllamaRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response: OllamaResponse = self
            .send(&url, &request)
            .await?
            .json()
            .await
            .map_err(|e| FeedbackError::CompletionError(format!("Failed to parse response: {e}")))?;

        Ok(response.message.content)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAI => self.complete_openai(prompt).await,
            LlmProvider::Ollama => self.complete_ollama(prompt).await,
        }
    }
}
