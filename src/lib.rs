pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
pub use index::VectorStore;
pub use models::BehavioralProfile;
pub use models::Emotion;
pub use models::Example;
pub use models::FeedbackResult;
pub use rag::FeedbackPipeline;
