//! Feedback generation handlers

use std::sync::Arc;

use crate::cli::output::*;
use crate::embeddings::EmbeddingClient;
use crate::index::VectorStore;
use crate::models::BehavioralProfile;
use crate::rag::interpret;
use crate::rag::pipeline::FeedbackRequest;
use crate::rag::ExampleRetriever;
use crate::rag::FeedbackPipeline;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask(
    config: &AppConfig,
    query: String,
    profile: BehavioralProfile,
    k: Option<usize>,
    show_prompt: bool,
    json: bool,
) -> Result<()> {
    let pipeline = FeedbackPipeline::from_config(config)?;
    let k = k.unwrap_or_else(|| pipeline.default_k());

    if !json {
        print_info(&format!("🔍 Analyzing query with {k} examples: \"{}\"", truncate_str(&query, 80)));
        if let Some(learner_type) = &profile.learner_type {
            println!("   Learner type: {learner_type}");
        }
    }

    let response = pipeline.run(FeedbackRequest { query, profile, k }).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.result)?);
        return Ok(());
    }

    if show_prompt {
        println!();
        print_examples(&response.examples);
        println!("\n📝 Prompt:\n{}", response.prompt);
    }
    print_feedback(&response.result);

    Ok(())
}

pub async fn handle_search(config: &AppConfig, query: String, k: Option<usize>) -> Result<()> {
    let k = k.unwrap_or_else(|| config.top_k());
    let store = Arc::new(VectorStore::load(
        &config.index.index_path,
        &config.index.metadata_path,
    )?);
    let embedder = Arc::new(EmbeddingClient::from_app_config(config)?);
    let retriever = ExampleRetriever::new(store, embedder, config.embedding_timeout());

    print_info(&format!("🔍 Searching {} examples for: \"{}\"", retriever.store().len(), truncate_str(&query, 80)));
    let results = retriever.retrieve_scored(&query, k).await?;
    print_search_results(&results);

    Ok(())
}

pub fn handle_interpret(profile: &BehavioralProfile) -> Result<()> {
    let interpreted = interpret(profile)?;
    print_profile(profile, &interpreted);
    Ok(())
}
