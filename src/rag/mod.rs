//! RAG (Retrieval-Augmented Generation) module
//!
//! This module provides end-to-end feedback generation for learner SQL:
//! - Semantic retrieval of labeled worked examples
//! - Behavioral profile interpretation
//! - Deterministic prompt composition
//! - Strict JSON parsing of the model's verdict
//!
//! # Examples
//!
//! ```rust,no_run
//! use sqlfeedback::config::AppConfig;
//! use sqlfeedback::models::{BehavioralProfile, Emotion};
//! use sqlfeedback::rag::FeedbackPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let pipeline = FeedbackPipeline::from_config(&config)?;
//!
//!     let profile = BehavioralProfile {
//!         typing_speed: 4.0,
//!         avg_flight_time: 150.0,
//!         avg_dwell_time: 80.0,
//!         backspace_rate: 0.01,
//!         delete_rate: 0.0,
//!         retry_count: 0,
//!         emotion: Emotion::Happy,
//!         learner_type: None,
//!     };
//!     let result = pipeline.generate("SELCT Name FROM Employees;", &profile).await?;
//!     println!("{}: {}", result.error_type, result.personalized_feedback);
//!
//!     Ok(())
//! }
//! ```

pub mod parser;
pub mod pipeline;
pub mod profile;
pub mod prompts;
pub mod retriever;

pub use parser::ResponseParser;
pub use pipeline::FeedbackPipeline;
pub use pipeline::FeedbackRequest;
pub use pipeline::FeedbackResponse;
pub use profile::interpret;
pub use profile::InterpretedProfile;
pub use prompts::PromptComposer;
pub use retriever::ExampleRetriever;
