//! Dawaa CLI
//!
//! Main entry point for the dawaa command-line tool.
//! Answers bilingual questions about medicines, one-shot or interactively.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use dawaa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Dawaa CLI - medicine questions in English or Arabic
#[derive(Parser, Debug)]
#[command(name = "dawaa")]
#[command(about = "Ask about medicine prices, usage, ingredients, and more", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "DAWAA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question and print the reply
    Ask(AskCommand),

    /// Start an interactive conversation
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.config, cli.log_level, cli.verbose, cli.no_color);
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Dawaa CLI starting");
    tracing::debug!("Price endpoint: {}", config.endpoints.price_api);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
