//! Offline index build: JSONL examples -> embeddings -> persisted store

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::VectorStore;
use crate::embeddings::Embedder;
use crate::embeddings::MAX_BATCH_SIZE;
use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::models::Example;

/// Read `{query, error_type, error_subtype, feedback}` records, one per line.
///
/// Blank lines are skipped; unknown keys are ignored.
pub fn load_examples_jsonl(path: &Path) -> Result<Vec<Example>> {
    let reader = BufReader::new(File::open(path)?);
    let mut examples = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let example: Example = serde_json::from_str(&line).map_err(|e| {
            FeedbackError::InvalidArgument(format!(
                "{}:{}: invalid example record: {e}",
                path.display(),
                line_no + 1
            ))
        })?;
        examples.push(example);
    }

    Ok(examples)
}

/// Embeds example queries in file order and assembles a [`VectorStore`]
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn build(&self, examples: Vec<Example>) -> Result<VectorStore> {
        if examples.is_empty() {
            return Err(FeedbackError::InvalidArgument(
                "no examples to index".to_string(),
            ));
        }

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(examples.len());
        for (batch_no, chunk) in examples.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = chunk.iter().map(|e| e.query.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != texts.len() {
                return Err(FeedbackError::EmbeddingError(format!(
                    "batch {batch_no}: requested {} embeddings, received {}",
                    texts.len(),
                    embeddings.len()
                )));
            }
            vectors.extend(embeddings);
            info!("Embedded {}/{} examples", vectors.len(), examples.len());
        }

        let dimension = vectors[0].len();
        if let Some((row, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension || v.iter().any(|x| !x.is_finite()))
        {
            return Err(FeedbackError::EmbeddingError(format!(
                "embedding {row} has dimension {} or non-finite values (expected {dimension})",
                v.len()
            )));
        }

        VectorStore::new(dimension, vectors, examples)
    }

    /// Build from a JSONL file and persist both artifacts
    pub async fn build_from_file(
        &self,
        input: &Path,
        index_path: &Path,
        metadata_path: &Path,
    ) -> Result<VectorStore> {
        let examples = load_examples_jsonl(input)?;
        info!("Loaded {} examples from {}", examples.len(), input.display());

        let store = self.build(examples).await?;
        store.save(index_path, metadata_path)?;

        info!(
            "Built index: {} vectors of dimension {} -> {}, {}",
            store.len(),
            store.dimension(),
            index_path.display(),
            metadata_path.display()
        );
        Ok(store)
    }
}
