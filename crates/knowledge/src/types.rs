//! Knowledge type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Provenance attached to every chunk. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source URL of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Scheme (product) the document describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Short description of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChunkMetadata {
    pub fn new(
        source: impl Into<String>,
        scheme: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            scheme: Some(scheme.into()),
            description: Some(description.into()),
        }
    }

    /// Parse stored metadata JSON; anything unreadable becomes all-default.
    pub fn from_json_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed chunk metadata: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

/// A stored span of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Text content
    pub text: String,

    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// New chunk with a random id.
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// A chunk returned from a search, with the index's own relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// One pre-extracted document, as read from an ingestion JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Where the text came from
    #[serde(alias = "source")]
    pub url: String,

    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Extracted text
    #[serde(alias = "content")]
    pub text: String,
}

/// Statistics for a persisted index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Index file location
    pub path: PathBuf,

    /// Whether the index file exists
    pub exists: bool,

    /// Number of distinct source URLs
    pub sources_count: usize,

    /// Number of chunks
    pub chunks_count: usize,
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnStats {
    /// Files read
    pub files_count: usize,

    /// Documents read
    pub documents_count: usize,

    /// Lines that could not be parsed
    pub skipped_count: usize,

    /// Chunks added to the index
    pub chunks_count: usize,

    /// Duration in seconds
    pub duration_secs: f64,
}
