//! CLI output formatting utilities

use crate::errors::FeedbackError;
use crate::index::ScoredExample;
use crate::models::BehavioralProfile;
use crate::models::Example;
use crate::models::FeedbackResult;
use crate::rag::InterpretedProfile;
use crate::AppConfig;

/// Safely truncate a string at a character boundary
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

pub fn print_feedback(result: &FeedbackResult) {
    println!("\n{}", "═".repeat(80));
    println!("🏷️  Error type:    {}", result.error_type);
    println!("🔎 Error subtype: {}", result.error_subtype);
    println!("\n💬 Feedback:\n");
    println!("{}", result.personalized_feedback.trim());
    println!("{}", "═".repeat(80));
}

pub fn print_examples(examples: &[Example]) {
    println!("📚 Retrieved examples ({}):", examples.len());
    for (idx, example) in examples.iter().enumerate() {
        println!(
            "  {}. [{} / {}] {}",
            idx + 1,
            example.error_type,
            example.error_subtype,
            truncate_str(&example.query, 80)
        );
    }
}

pub fn print_search_results(results: &[ScoredExample]) {
    println!("Found {} examples:", results.len());
    for (idx, scored) in results.iter().enumerate() {
        println!(
            "  {}. distance {:.4} | {} / {}",
            idx + 1,
            scored.distance,
            scored.example.error_type,
            scored.example.error_subtype
        );
        println!("     Query:    {}", truncate_str(&scored.example.query, 100));
        println!("     Feedback: {}", truncate_str(&scored.example.feedback, 100));
    }
}

pub fn print_profile(profile: &BehavioralProfile, interpreted: &InterpretedProfile) {
    println!("🧑 Behavioral profile:");
    if let Some(learner_type) = &profile.learner_type {
        println!("  Learner type:   {learner_type}");
    }
    println!(
        "  Typing speed:   {} keys/s -> {}",
        profile.typing_speed, interpreted.pace
    );
    println!(
        "  Dwell time:     {} ms -> {}",
        profile.avg_dwell_time, interpreted.dwell
    );
    println!(
        "  Flight time:    {} ms -> {}",
        profile.avg_flight_time, interpreted.flight
    );
    println!(
        "  Correction:     {:.3} -> {}",
        interpreted.correction_rate, interpreted.correction
    );
    println!("  Retries:        {}", profile.retry_count);
    println!("  Emotion:        {}", profile.emotion);
}

/// Print a pipeline failure with its taxonomy kind and any raw model text
pub fn print_feedback_error(err: &FeedbackError) {
    print_error(&format!("{}: {err}", err.kind()));
    if let Some(raw) = err.raw_output() {
        println!("\n📄 Raw model output:\n{raw}");
    }
}

pub fn print_config(config: &AppConfig) {
    println!("📋 sqlfeedback Configuration:");
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!(
        "  API key: {}",
        if config.embedding_api_key().is_some() { "set" } else { "not set" }
    );
    println!("  Timeout: {}s", config.embeddings.timeout_secs);
    println!();

    println!("🤖 LLM:");
    println!("  Provider: {}", config.llm.provider);
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  Temperature: {}", config.llm.temperature);
    println!(
        "  API key: {}",
        if config.llm_key().is_some() { "set" } else { "not set" }
    );
    println!("  Timeout: {}s", config.llm.timeout_secs);
    println!();

    println!("📦 Index:");
    println!("  Vectors: {}", config.index.index_path.display());
    println!("  Metadata: {}", config.index.metadata_path.display());
    println!("  Top k: {}", config.top_k());
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.directory);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}
