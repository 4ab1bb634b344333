//! Vector index abstraction for knowledge chunks.

use crate::types::{Chunk, IndexStats, ScoredChunk};
use fundqa_core::AppResult;
use std::sync::Arc;

/// Similarity search over persisted chunks.
///
/// Implementations must allow concurrent `search` calls and serialize
/// `add`/`clear` against them. A missing persisted index is an empty
/// index, not an error.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `k` chunks, most relevant first, scored by the index's own metric.
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredChunk>>;

    /// Insert chunks, returning how many were stored.
    async fn add(&self, chunks: &[Chunk]) -> AppResult<usize>;

    /// Remove every stored chunk.
    async fn clear(&self) -> AppResult<()>;

    /// Whether a persisted index is present.
    fn exists(&self) -> bool;

    async fn stats(&self) -> AppResult<IndexStats>;
}

/// Shared handle opened once per process.
pub type IndexHandle = Arc<dyn VectorIndex>;
