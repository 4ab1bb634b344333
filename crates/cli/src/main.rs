//! fundqa CLI
//!
//! Answers factual questions about mutual fund schemes from a local
//! document index, and manages that index.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, BatchCommand, ExamplesCommand, KnowledgeCommand};
use fundqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Mutual fund FAQ assistant grounded in official scheme documents
#[derive(Parser, Debug)]
#[command(name = "fundqa")]
#[command(about = "Factual mutual fund Q&A over a local document index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "FUNDQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.fundqa/config.yaml)
    #[arg(short, long, global = true, env = "FUNDQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generation provider (gemini, grok)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Default number of chunks to retrieve per question
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Timeout in seconds for index and provider calls
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Answer every question in a file, one per line
    Batch(BatchCommand),

    /// Print example questions
    Examples(ExamplesCommand),

    /// Document index management
    Knowledge(KnowledgeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Defaults, then config file, then environment, then flags
    let config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        cli.provider,
        cli.model,
        cli.top_k,
        cli.timeout,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("fundqa starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Index: {:?}", config.index_path());

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Batch(_) => "batch",
        Commands::Examples(_) => "examples",
        Commands::Knowledge(_) => "knowledge",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Batch(cmd) => cmd.execute(&config).await,
        Commands::Examples(cmd) => cmd.execute(),
        Commands::Knowledge(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
