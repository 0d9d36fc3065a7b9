//! Complete feedback pipeline: Retrieve -> Compose -> Complete -> Parse

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::index::VectorStore;
use crate::llm::CompletionClient;
use crate::llm::LlmClient;
use crate::models::BehavioralProfile;
use crate::models::Example;
use crate::models::FeedbackResult;
use crate::rag::profile::interpret;
use crate::rag::ExampleRetriever;
use crate::rag::PromptComposer;
use crate::rag::ResponseParser;

/// Default number of few-shot examples per request
pub const DEFAULT_K: usize = 2;

/// Feedback request configuration
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    pub query: String,
    pub profile: BehavioralProfile,
    pub k: usize,
}

/// Parsed verdict plus everything that produced it
#[derive(Debug, Clone)]
pub struct FeedbackResponse {
    pub result: FeedbackResult,
    pub examples: Vec<Example>,
    pub prompt: String,
    pub raw_output: String,
}

/// Orchestrates retrieval, prompt composition, completion and parsing.
///
/// Holds no per-request state; one instance serves concurrent requests.
/// Performs no retries.
pub struct FeedbackPipeline {
    retriever: ExampleRetriever,
    composer: PromptComposer,
    parser: ResponseParser,
    llm: Arc<dyn CompletionClient>,
    completion_timeout: Duration,
    default_k: usize,
}

impl FeedbackPipeline {
    /// Create from existing services
    pub fn from_services(
        store: Arc<VectorStore>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn CompletionClient>,
        embed_timeout: Duration,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            retriever: ExampleRetriever::new(store, embedder, embed_timeout),
            composer: PromptComposer,
            parser: ResponseParser,
            llm,
            completion_timeout,
            default_k: DEFAULT_K,
        }
    }

    /// Load the index and build HTTP clients from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(VectorStore::load(
            &config.index.index_path,
            &config.index.metadata_path,
        )?);
        let embedder = Arc::new(EmbeddingClient::from_app_config(config)?);
        let llm = Arc::new(LlmClient::from_app_config(config)?);

        Ok(Self::from_services(
            store,
            embedder,
            llm,
            config.embedding_timeout(),
            config.completion_timeout(),
        )
        .with_default_k(config.top_k()))
    }

    #[must_use]
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    pub fn retriever(&self) -> &ExampleRetriever {
        &self.retriever
    }

    /// Classify `query` and produce personalized feedback using the default k
    pub async fn generate(&self, query: &str, profile: &BehavioralProfile) -> Result<FeedbackResult> {
        self.generate_with_k(query, profile, self.default_k).await
    }

    pub async fn generate_with_k(
        &self,
        query: &str,
        profile: &BehavioralProfile,
        k: usize,
    ) -> Result<FeedbackResult> {
        let response = self
            .run(FeedbackRequest {
                query: query.to_string(),
                profile: profile.clone(),
                k,
            })
            .await?;
        Ok(response.result)
    }

    /// Run the full pipeline and keep the intermediate artifacts
    pub async fn run(&self, request: FeedbackRequest) -> Result<FeedbackResponse> {
        let span = tracing::info_span!("feedback", request_id = %Uuid::new_v4(), k = request.k);
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: FeedbackRequest) -> Result<FeedbackResponse> {
        let FeedbackRequest { query, profile, k } = request;
        info!("Processing feedback request ({} chars)", query.len());

        if query.trim().is_empty() {
            return Err(FeedbackError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        // Reject bad profiles before any remote call
        let interpreted = interpret(&profile)?;
        debug!("Interpreted profile: {:?}", interpreted.labels());

        debug!("Step 1: Retrieving examples");
        let examples = self.retriever.retrieve(&query, k).await?;

        debug!("Step 2: Composing prompt");
        let prompt = self
            .composer
            .compose_interpreted(&query, &examples, &profile, &interpreted);
        debug!("=== LLM PROMPT ===\n{}\n=== END PROMPT ===", prompt);

        debug!("Step 3: Requesting completion");
        let raw_output = tokio::time::timeout(self.completion_timeout, self.llm.complete(&prompt))
            .await
            .map_err(|_| FeedbackError::Timeout {
                operation: "completion",
                seconds: self.completion_timeout.as_secs(),
            })??;

        debug!("Step 4: Parsing response");
        let result = self.parser.parse(&raw_output).map_err(|e| {
            warn!("Model response rejected ({}): {}", e.kind(), e);
            e
        })?;

        info!(
            "Feedback generated: {} / {}",
            result.error_type, result.error_subtype
        );

        Ok(FeedbackResponse {
            result,
            examples,
            prompt,
            raw_output,
        })
    }
}
