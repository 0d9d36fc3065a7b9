//! In-memory flat L2 index over labeled examples

use std::path::Path;

use tracing::debug;
use tracing::info;

use super::persist;
use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::models::Example;

/// Example paired with its squared L2 distance to the query vector
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredExample {
    pub example: Example,
    pub distance: f32,
}

/// Exact nearest-neighbor store.
///
/// Vectors are kept in one contiguous row-major buffer; row `i` belongs to
/// `examples[i]`. The store is immutable once constructed and is shared
/// across requests behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    vectors: Vec<f32>,
    examples: Vec<Example>,
}

impl VectorStore {
    /// Build a store from positionally aligned vectors and examples
    pub fn new(dimension: usize, vectors: Vec<Vec<f32>>, examples: Vec<Example>) -> Result<Self> {
        if dimension == 0 {
            return Err(FeedbackError::IndexCorruption(
                "index dimension must be positive".to_string(),
            ));
        }
        if vectors.len() != examples.len() {
            return Err(FeedbackError::IndexCorruption(format!(
                "{} vectors but {} metadata records",
                vectors.len(),
                examples.len()
            )));
        }

        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(FeedbackError::IndexCorruption(format!(
                    "vector {row} has dimension {}, expected {dimension}",
                    vector.len()
                )));
            }
            flat.extend_from_slice(vector);
        }

        Self::from_flat(dimension, flat, examples)
    }

    pub(crate) fn from_flat(
        dimension: usize,
        vectors: Vec<f32>,
        examples: Vec<Example>,
    ) -> Result<Self> {
        if dimension == 0 || vectors.len() % dimension != 0 {
            return Err(FeedbackError::IndexCorruption(format!(
                "{} floats do not divide into rows of dimension {dimension}",
                vectors.len()
            )));
        }
        let rows = vectors.len() / dimension;
        if rows != examples.len() {
            return Err(FeedbackError::IndexCorruption(format!(
                "{rows} vectors but {} metadata records",
                examples.len()
            )));
        }

        Ok(Self {
            dimension,
            vectors,
            examples,
        })
    }

    /// Load the persisted index and its metadata file
    pub fn load(index_path: impl AsRef<Path>, metadata_path: impl AsRef<Path>) -> Result<Self> {
        let index_path = index_path.as_ref();
        let metadata_path = metadata_path.as_ref();

        let (dimension, vectors) = persist::read_index(index_path)?;
        let examples = persist::read_metadata(metadata_path)?;
        let store = Self::from_flat(dimension, vectors, examples)?;

        info!(
            "Loaded vector store: {} examples, dimension {} ({}, {})",
            store.len(),
            store.dimension,
            index_path.display(),
            metadata_path.display()
        );

        Ok(store)
    }

    /// Persist the store as an index file plus metadata file
    pub fn save(
        &self,
        index_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<()> {
        persist::write_index(index_path.as_ref(), self.dimension, &self.vectors)?;
        persist::write_metadata(metadata_path.as_ref(), &self.examples)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Validate that `k` results can be served without embedding anything
    pub fn check_k(&self, k: usize) -> Result<()> {
        if self.is_empty() {
            return Err(FeedbackError::EmptyIndex);
        }
        if k == 0 {
            return Err(FeedbackError::InvalidArgument(
                "k must be at least 1".to_string(),
            ));
        }
        if k > self.len() {
            return Err(FeedbackError::KExceedsStoreSize {
                requested: k,
                available: self.len(),
            });
        }
        Ok(())
    }

    /// Return the `k` stored examples closest to `query` by squared L2
    /// distance, closest first. Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredExample>> {
        self.check_k(k)?;
        if query.len() != self.dimension {
            return Err(FeedbackError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut ranked: Vec<(usize, f32)> = self
            .vectors
            .chunks_exact(self.dimension)
            .map(|row| squared_l2(query, row))
            .enumerate()
            .collect();

        // sort_by is stable, so ties stay in row order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(k);

        debug!(
            "Vector search returned {} of {} rows (best distance {:?})",
            ranked.len(),
            self.len(),
            ranked.first().map(|(_, d)| *d)
        );

        Ok(ranked
            .into_iter()
            .map(|(row, distance)| ScoredExample {
                example: self.examples[row].clone(),
                distance,
            })
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
