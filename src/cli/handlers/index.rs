//! Index build handler

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::output::*;
use crate::embeddings::EmbeddingClient;
use crate::index::IndexBuilder;
use crate::AppConfig;
use crate::Result;

pub async fn handle_build_index(
    config: &AppConfig,
    input: PathBuf,
    index: Option<PathBuf>,
    metadata: Option<PathBuf>,
    batch_size: usize,
) -> Result<()> {
    let index_path = index.unwrap_or_else(|| config.index.index_path.clone());
    let metadata_path = metadata.unwrap_or_else(|| config.index.metadata_path.clone());

    print_info(&format!(
        "📦 Building index from {} with {} ({})",
        input.display(),
        config.embedding_model(),
        config.embeddings.provider
    ));

    let started = Instant::now();
    let embedder = Arc::new(EmbeddingClient::from_app_config(config)?);
    let store = IndexBuilder::new(embedder)
        .with_batch_size(batch_size)
        .build_from_file(&input, &index_path, &metadata_path)
        .await?;

    if store.dimension() != config.embedding_dimension() {
        print_warning(&format!(
            "Embeddings have dimension {} but config declares {}",
            store.dimension(),
            config.embedding_dimension()
        ));
    }

    print_success(&format!(
        "Indexed {} examples (dimension {}) in {:.1}s",
        store.len(),
        store.dimension(),
        started.elapsed().as_secs_f64()
    ));
    println!("   Vectors:  {}", index_path.display());
    println!("   Metadata: {}", metadata_path.display());

    Ok(())
}
