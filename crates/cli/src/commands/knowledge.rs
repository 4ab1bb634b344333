//! Knowledge command handler.
//!
//! Manages the local document index. No generation provider is needed.

use super::print_json;
use clap::{Args, Subcommand};
use fundqa_core::{config::AppConfig, AppResult};
use fundqa_knowledge::{learn, open_index, LearnOptions};
use std::path::PathBuf;

/// Document index management
#[derive(Args, Debug)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    pub action: KnowledgeAction,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeAction {
    /// Add documents from JSONL files to the index
    Learn(KnowledgeLearnCommand),
    /// Remove every chunk from the index
    Clean(KnowledgeCleanCommand),
    /// Show index statistics
    Stats(KnowledgeStatsCommand),
}

impl KnowledgeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate_numbers()?;

        match &self.action {
            KnowledgeAction::Learn(cmd) => cmd.execute(config).await,
            KnowledgeAction::Clean(cmd) => cmd.execute(config).await,
            KnowledgeAction::Stats(cmd) => cmd.execute(config).await,
        }
    }
}

/// Learn from JSONL documents
#[derive(Args, Debug)]
pub struct KnowledgeLearnCommand {
    /// JSONL files or directories containing .jsonl files
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// Clear the index before learning
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeLearnCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge learn command");

        config.ensure_data_dir()?;
        let index = open_index(config)?;

        let options = LearnOptions::new(self.input.clone())
            .with_chunking(config.chunk_size, config.chunk_overlap)
            .with_reset(self.reset);

        let stats = learn(index.as_ref(), &options).await?;

        if self.json {
            print_json(&stats)?;
        } else {
            println!(
                "Learned {} documents from {} files ({} chunks, {} lines skipped) in {:.2}s",
                stats.documents_count,
                stats.files_count,
                stats.chunks_count,
                stats.skipped_count,
                stats.duration_secs
            );
        }

        Ok(())
    }
}

/// Clean the index
#[derive(Args, Debug)]
pub struct KnowledgeCleanCommand {}

impl KnowledgeCleanCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge clean command");

        let index = open_index(config)?;
        if !index.exists() {
            println!("No index at {}", config.index_path().display());
            return Ok(());
        }

        index.clear().await?;
        println!("Index at {} cleaned", config.index_path().display());

        Ok(())
    }
}

/// Show index stats
#[derive(Args, Debug)]
pub struct KnowledgeStatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeStatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge stats command");

        let stats = open_index(config)?.stats().await?;

        if self.json {
            print_json(&stats)?;
        } else {
            println!("Index: {}", stats.path.display());
            if !stats.exists {
                println!("  (not created yet; run 'fundqa knowledge learn')");
            }
            println!("  Sources: {}", stats.sources_count);
            println!("  Chunks:  {}", stats.chunks_count);
        }

        Ok(())
    }
}
