//! Command handlers for the fundqa CLI.

pub mod ask;
pub mod batch;
pub mod examples;
pub mod knowledge;

pub use ask::AskCommand;
pub use batch::BatchCommand;
pub use examples::ExamplesCommand;
pub use knowledge::KnowledgeCommand;

use fundqa_core::{config::AppConfig, AppResult};
use fundqa_knowledge::{build_assistant, open_index, Assistant};
use fundqa_llm::{create_provider, ProviderSettings};
use serde::Serialize;

/// Validate configuration and wire the index and provider once.
///
/// Missing or placeholder credentials fail here, before any question is
/// answered.
pub(crate) fn assistant_from_config(config: &AppConfig) -> AppResult<Assistant> {
    config.validate()?;

    let index = open_index(config)?;
    if !index.exists() {
        tracing::warn!(
            "No index at {:?}; run 'fundqa knowledge learn' first",
            config.index_path()
        );
    }

    let provider = create_provider(&ProviderSettings::from_config(config))?;
    tracing::info!(
        "Using {} ({})",
        provider.provider_name(),
        provider.model_name()
    );

    build_assistant(config, index, provider)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
