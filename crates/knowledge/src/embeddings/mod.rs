//! Text embeddings for the chunk index.

pub mod provider;
pub mod trigram;

pub use provider::{create_embedder, EmbeddingProvider};
pub use trigram::TrigramEmbedder;
