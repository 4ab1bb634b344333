//! Retrieval and context formatting.

use crate::rag::types::{SourceRef, NO_CONTEXT};
use crate::types::ScoredChunk;
use crate::vector_index::IndexHandle;
use fundqa_core::{AppError, AppResult};
use std::time::Duration;

const SEPARATOR: &str = "\n---\n";

/// Looks up chunks for a question and turns them into prompt context.
#[derive(Clone)]
pub struct Retriever {
    index: IndexHandle,
    default_k: usize,
    timeout: Duration,
}

impl Retriever {
    pub fn new(index: IndexHandle, default_k: usize, timeout: Duration) -> Self {
        Self {
            index,
            default_k,
            timeout,
        }
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Chunks in the index's order. `k` falls back to the configured default.
    pub async fn retrieve(&self, query: &str, k: Option<usize>) -> AppResult<Vec<ScoredChunk>> {
        let k = k.unwrap_or(self.default_k);

        match tokio::time::timeout(self.timeout, self.index.search(query, k)).await {
            Ok(Ok(results)) => {
                tracing::debug!("Retrieved {} chunks for top-{}", results.len(), k);
                Ok(results)
            }
            Ok(Err(e)) => Err(AppError::Retrieval(e.to_string())),
            Err(_) => Err(AppError::Retrieval(format!(
                "index search timed out after {}s",
                self.timeout.as_secs_f64()
            ))),
        }
    }

    pub async fn retrieve_and_format(
        &self,
        query: &str,
        k: Option<usize>,
    ) -> AppResult<(String, Vec<SourceRef>)> {
        let results = self.retrieve(query, k).await?;
        Ok(format_context(&results))
    }
}

/// Numbered `[Source i]` blocks joined by `---`, plus one `SourceRef` per block.
pub fn format_context(results: &[ScoredChunk]) -> (String, Vec<SourceRef>) {
    if results.is_empty() {
        return (NO_CONTEXT.to_string(), Vec::new());
    }

    let context = results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[Source {}]\n{}\n", i + 1, r.chunk.text))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let sources = results.iter().map(SourceRef::from_scored).collect();

    (context, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::test_support::StubIndex;
    use crate::types::{Chunk, ChunkMetadata};
    use std::sync::Arc;

    fn scored(text: &str, scheme: &str, score: f32) -> ScoredChunk {
        ScoredChunk::new(
            Chunk::new(text, ChunkMetadata::new(format!("https://example.com/{scheme}"), scheme, "")),
            score,
        )
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_context(&[]), ("No relevant information found.".to_string(), vec![]));
    }

    #[test]
    fn test_format_single() {
        let (context, sources) = format_context(&[scored("Expense ratio is 1.05%.", "Fund X", 0.85)]);
        assert_eq!(context, "[Source 1]\nExpense ratio is 1.05%.\n");
        assert_eq!(context.matches("[Source ").count(), 1);
        assert_eq!(context.matches(SEPARATOR).count(), 0);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].scheme, "Fund X");
        assert_eq!(sources[0].relevance_score, 0.85);
    }

    #[test]
    fn test_format_three_in_order() {
        let results = vec![
            scored("first", "A", 0.9),
            scored("second", "B", 0.7),
            scored("third", "C", 0.4),
        ];
        let (context, sources) = format_context(&results);

        assert_eq!(context.matches(SEPARATOR).count(), 2);
        let p1 = context.find("[Source 1]\nfirst").unwrap();
        let p2 = context.find("[Source 2]\nsecond").unwrap();
        let p3 = context.find("[Source 3]\nthird").unwrap();
        assert!(p1 < p2 && p2 < p3);

        let schemes: Vec<_> = sources.iter().map(|s| s.scheme.as_str()).collect();
        assert_eq!(schemes, ["A", "B", "C"]);
    }

    #[test]
    fn test_format_keeps_unbounded_scores() {
        let (_, sources) = format_context(&[scored("t", "A", 12.5), scored("u", "B", -3.0)]);
        assert_eq!(sources[0].relevance_score, 12.5);
        assert_eq!(sources[1].relevance_score, -3.0);
    }

    #[tokio::test]
    async fn test_retrieve_uses_default_k() {
        let index = Arc::new(StubIndex::with_results(vec![]));
        let retriever = Retriever::new(index.clone(), 3, Duration::from_secs(5));

        retriever.retrieve("q", None).await.unwrap();
        assert_eq!(index.last_k(), Some(3));

        retriever.retrieve("q", Some(7)).await.unwrap();
        assert_eq!(index.last_k(), Some(7));
    }

    #[tokio::test]
    async fn test_retrieve_preserves_order() {
        let results = vec![scored("low", "A", 0.1), scored("high", "B", 0.9)];
        let index = Arc::new(StubIndex::with_results(results));
        let retriever = Retriever::new(index, 3, Duration::from_secs(5));

        let got = retriever.retrieve("q", None).await.unwrap();
        assert_eq!(got[0].chunk.text, "low");
        assert_eq!(got[1].chunk.text, "high");
    }

    #[tokio::test]
    async fn test_retrieve_and_format() {
        let index = Arc::new(StubIndex::with_results(vec![scored("only", "A", 0.5)]));
        let retriever = Retriever::new(index, 3, Duration::from_secs(5));

        let (context, sources) = retriever.retrieve_and_format("q", None).await.unwrap();
        assert_eq!(context, "[Source 1]\nonly\n");
        assert_eq!(sources.len(), 1);

        let empty = Retriever::new(Arc::new(StubIndex::with_results(vec![])), 3, Duration::from_secs(5));
        let (context, sources) = empty.retrieve_and_format("q", None).await.unwrap();
        assert_eq!(context, NO_CONTEXT);
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_failure_is_retrieval_error() {
        let index = Arc::new(StubIndex::failing());
        let retriever = Retriever::new(index, 3, Duration::from_secs(5));

        let err = retriever.retrieve("q", None).await.unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_retrieve_timeout() {
        let index = Arc::new(StubIndex::slow(Duration::from_millis(500)));
        let retriever = Retriever::new(index, 3, Duration::from_millis(20));

        let err = retriever.retrieve("q", None).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
