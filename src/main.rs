use clap::Parser;
use sqlfeedback::cli::handlers::*;
use sqlfeedback::cli::output::print_feedback_error;
use sqlfeedback::cli::Cli;
use sqlfeedback::cli::Commands;
use sqlfeedback::config::AppConfig;
use sqlfeedback::Result;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        print_feedback_error(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = sqlfeedback::logging::init_logging_with_config(&config)?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Ask {
            query,
            profile,
            k,
            show_prompt,
            json,
        } => {
            let profile = profile.into_profile()?;
            handle_ask(&config, query, profile, k, show_prompt, json).await?;
        }
        Commands::Search { query, k } => {
            handle_search(&config, query, k).await?;
        }
        Commands::Interpret { profile } => {
            handle_interpret(&profile.into_profile()?)?;
        }
        Commands::BuildIndex {
            input,
            index,
            metadata,
            batch_size,
        } => {
            handle_build_index(&config, input, index, metadata, batch_size).await?;
        }
        Commands::Serve { host, port, cors } => {
            handle_serve_api(&config, host, port, cors).await?;
        }
        Commands::Config => {
            handle_config_command(&config)?;
        }
    }

    Ok(())
}
