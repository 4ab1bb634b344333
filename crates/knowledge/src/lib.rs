//! Fund document knowledge base and grounded question answering.
//!
//! Documents are chunked into a local SQLite vector index. Questions are
//! classified by the guardrail, and factual ones are answered from
//! retrieved chunks by a generation provider.

pub mod chunker;
pub mod embeddings;
pub mod guardrail;
pub mod index;
pub mod ingest;
pub mod rag;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use embeddings::{create_embedder, EmbeddingProvider, TrigramEmbedder};
pub use guardrail::{classify, Classification};
pub use index::SqliteIndex;
pub use ingest::{learn, LearnOptions};
pub use rag::{
    format_response, AnswerGenerator, AnswerResponse, AskOptions, Assistant, Retriever, SourceRef,
    TerminalState,
};
pub use types::{Chunk, ChunkMetadata, IndexStats, LearnStats, ScoredChunk, SourceDocument};
pub use vector_index::{IndexHandle, VectorIndex};

use fundqa_core::{AppConfig, AppResult};
use fundqa_llm::GenerationProvider;
use fundqa_prompt::{load_prompt_file, PromptBuilder};
use std::sync::Arc;
use std::time::Duration;

/// Open the index configured for this workspace.
pub fn open_index(config: &AppConfig) -> AppResult<IndexHandle> {
    let embedder = create_embedder(&config.embedding)?;
    let index = SqliteIndex::open(config.index_path(), embedder)?;
    Ok(Arc::new(index))
}

/// Prompt builder from the configured prompt file, or the built-in template.
pub fn load_prompt_builder(config: &AppConfig) -> AppResult<PromptBuilder> {
    match &config.prompt_file {
        Some(path) => {
            let definition = load_prompt_file(path)?;
            tracing::info!("Using prompt '{}' from {:?}", definition.id, path);
            PromptBuilder::from_definition(&definition)
        }
        None => PromptBuilder::new(),
    }
}

/// Wire an `Assistant` from configuration and already-built collaborators.
pub fn build_assistant(
    config: &AppConfig,
    index: IndexHandle,
    provider: Arc<dyn GenerationProvider>,
) -> AppResult<Assistant> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let retriever = Retriever::new(index, config.top_k, timeout);
    let prompt_builder = Arc::new(load_prompt_builder(config)?);

    let generator = AnswerGenerator::new(retriever, provider, prompt_builder)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_timeout(timeout);

    Ok(Assistant::new(generator))
}
