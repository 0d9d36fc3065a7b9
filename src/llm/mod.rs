//! Language model access
//!
//! The pipeline only needs "prompt in, raw text out". [`CompletionClient`]
//! is that seam; [`LlmClient`] implements it over HTTP for OpenAI-compatible
//! and Ollama chat endpoints.

pub mod client;

use async_trait::async_trait;

pub use client::LlmClient;
pub use client::LlmProvider;

use crate::errors::Result;

/// Prompt-to-text capability
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the model's raw reply. The text is not guaranteed to be JSON.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
