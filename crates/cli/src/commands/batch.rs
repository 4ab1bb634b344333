//! Batch command handler.

use super::{assistant_from_config, print_json};
use clap::Args;
use fundqa_core::{config::AppConfig, AppError, AppResult};
use fundqa_knowledge::format_response;
use std::path::{Path, PathBuf};

/// Answer every question in a file
#[derive(Args, Debug)]
pub struct BatchCommand {
    /// File with one question per line (blank lines are ignored)
    pub file: PathBuf,

    /// Output as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl BatchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing batch command for {:?}", self.file);

        let questions = read_questions(&self.file)?;
        tracing::info!("Read {} questions", questions.len());

        let assistant = assistant_from_config(config)?;
        let responses = assistant.ask_all(&questions).await;

        if self.json {
            print_json(&responses)?;
        } else {
            let divider = "=".repeat(80);
            for response in &responses {
                println!("{}", format_response(response));
                println!("{}", divider);
            }
        }

        Ok(())
    }
}

fn read_questions(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read questions file {:?}: {}", path, e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
