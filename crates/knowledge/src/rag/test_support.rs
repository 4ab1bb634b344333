//! Hand-written index and provider doubles with call counters.

use crate::types::{Chunk, IndexStats, ScoredChunk};
use crate::vector_index::VectorIndex;
use fundqa_core::{AppError, AppResult};
use fundqa_llm::{GenerationProvider, GenerationRequest, ProviderError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) struct StubIndex {
    results: Vec<ScoredChunk>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_k: Mutex<Option<usize>>,
}

impl StubIndex {
    pub(crate) fn with_results(results: Vec<ScoredChunk>) -> Self {
        Self {
            results,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            last_k: Mutex::new(None),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_results(vec![])
        }
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with_results(vec![])
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_k(&self) -> Option<usize> {
        *self.last_k.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl VectorIndex for StubIndex {
    async fn search(&self, _query: &str, k: usize) -> AppResult<Vec<ScoredChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_k.lock().unwrap() = Some(k);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AppError::Knowledge("index unavailable".to_string()));
        }

        Ok(self.results.iter().take(k).cloned().collect())
    }

    async fn add(&self, chunks: &[Chunk]) -> AppResult<usize> {
        Ok(chunks.len())
    }

    async fn clear(&self) -> AppResult<()> {
        Ok(())
    }

    fn exists(&self) -> bool {
        !self.results.is_empty()
    }

    async fn stats(&self) -> AppResult<IndexStats> {
        Ok(IndexStats {
            path: PathBuf::from("stub"),
            exists: self.exists(),
            sources_count: 0,
            chunks_count: self.results.len(),
        })
    }
}

pub(crate) struct StubProvider {
    reply: Result<String, ProviderError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl StubProvider {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn failing(err: ProviderError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying("")
        }
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying("late")
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply.clone()
    }
}
