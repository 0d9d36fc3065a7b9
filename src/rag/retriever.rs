//! Nearest-neighbor retrieval of worked examples

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::index::ScoredExample;
use crate::index::VectorStore;
use crate::models::Example;

/// Embeds a query and looks up its closest stored examples
pub struct ExampleRetriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    embed_timeout: Duration,
}

impl ExampleRetriever {
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn Embedder>, embed_timeout: Duration) -> Self {
        Self {
            store,
            embedder,
            embed_timeout,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Top-k examples for `query`, closest first
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Example>> {
        Ok(self
            .retrieve_scored(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.example)
            .collect())
    }

    /// Top-k examples with their squared L2 distances
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredExample>> {
        // Fail on k before spending an embedding call
        self.store.check_k(k)?;

        debug!("Embedding query for retrieval ({} chars)", query.len());
        let embedding = tokio::time::timeout(self.embed_timeout, self.embedder.embed(query))
            .await
            .map_err(|_| FeedbackError::Timeout {
                operation: "embedding",
                seconds: self.embed_timeout.as_secs(),
            })??;

        if embedding.len() != self.store.dimension() {
            return Err(FeedbackError::DimensionMismatch {
                expected: self.store.dimension(),
                actual: embedding.len(),
            });
        }

        let results = self.store.search(&embedding, k)?;
        debug!("Retrieved {} examples", results.len());
        Ok(results)
    }
}
