//! Ask command handler.

use super::{assistant_from_config, print_json};
use clap::Args;
use fundqa_core::{config::AppConfig, AppError, AppResult};
use fundqa_knowledge::{format_response, AskOptions};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Number of chunks to retrieve (default: configured topK)
    #[arg(short = 'k')]
    pub k: Option<usize>,

    /// Temperature for response generation (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let options = self.options()?;
        let assistant = assistant_from_config(config)?;
        let response = assistant.ask_with(&self.question, options).await;

        if self.json {
            print_json(&response)?;
        } else {
            println!("{}", format_response(&response));
        }

        Ok(())
    }

    fn options(&self) -> AppResult<AskOptions> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AppError::Config(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    t
                )));
            }
        }
        if self.k == Some(0) {
            return Err(AppError::Config("-k must be positive".to_string()));
        }

        Ok(AskOptions {
            k: self.k,
            temperature: self.temperature,
        })
    }
}
