//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::errors::FeedbackError;
use crate::models::BehavioralProfile;
use crate::models::Emotion;
use crate::Result;

#[derive(Parser)]
#[command(name = "sqlfeedback")]
#[command(about = "Classify SQL mistakes and generate personalized feedback")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a configuration file (default: config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a query and generate feedback for a learner
    Ask {
        /// The learner's SQL query
        query: String,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Number of examples to retrieve (default: from config)
        #[arg(short, long)]
        k: Option<usize>,
        /// Show retrieved examples and the exact prompt
        #[arg(long)]
        show_prompt: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the closest labeled examples for a query
    Search {
        /// SQL query to look up
        query: String,
        /// Number of examples to return [default: retrieval.top_k]
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Show how a behavioral profile is interpreted
    Interpret {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Embed a JSONL file of examples and write the index
    BuildIndex {
        /// JSONL file with query, error_type, error_subtype, feedback
        input: PathBuf,
        /// Output index file (default: from config)
        #[arg(long)]
        index: Option<PathBuf>,
        /// Output metadata file (default: from config)
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Texts per embedding request
        #[arg(long, default_value = "100")]
        batch_size: usize,
    },
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config,
}

/// Behavioral profile from a JSON file or individual flags
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// JSON file holding a full profile; overrides the flags below
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Keys per second
    #[arg(long, default_value = "4.0")]
    pub typing_speed: f64,
    /// Average milliseconds between keys
    #[arg(long, default_value = "150.0")]
    pub flight_time: f64,
    /// Average milliseconds a key is held
    #[arg(long, default_value = "90.0")]
    pub dwell_time: f64,
    #[arg(long, default_value = "0.05")]
    pub backspace_rate: f64,
    #[arg(long, default_value = "0.0")]
    pub delete_rate: f64,
    #[arg(long, default_value = "0")]
    pub retry_count: u32,
    /// angry, sad, happy, calm or neutral
    #[arg(long, default_value = "neutral")]
    pub emotion: String,
    /// Free-form learner label shown in output only
    #[arg(long)]
    pub learner_type: Option<String>,
}

impl ProfileArgs {
    pub fn into_profile(self) -> Result<BehavioralProfile> {
        if let Some(path) = self.profile {
            let content = std::fs::read_to_string(&path)?;
            return serde_json::from_str(&content).map_err(|e| {
                FeedbackError::InvalidProfile(format!("{}: {e}", path.display()))
            });
        }

        Ok(BehavioralProfile {
            typing_speed: self.typing_speed,
            avg_flight_time: self.flight_time,
            avg_dwell_time: self.dwell_time,
            backspace_rate: self.backspace_rate,
            delete_rate: self.delete_rate,
            retry_count: self.retry_count,
            emotion: self.emotion.parse::<Emotion>()?,
            learner_type: self.learner_type,
        })
    }
}
