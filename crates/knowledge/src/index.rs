//! SQLite-backed vector index for knowledge chunks.
//!
//! All vectors are loaded into memory when the index is opened; searches
//! score against that copy under a read lock. Writes go to SQLite and the
//! in-memory copy under the write lock.
//!
//! The `meta` table records which embedder built the vectors. An index
//! built by a different embedder or vector size refuses to search or add
//! until it is cleared.

use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, ChunkMetadata, IndexStats, ScoredChunk};
use crate::vector_index::VectorIndex;
use fundqa_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    metadata TEXT
);
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

const META_EMBEDDER: &str = "embedder";
const META_DIMENSIONS: &str = "dimensions";

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Embedder name and vector size the stored vectors were made with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EmbedderTag {
    provider: String,
    dimensions: usize,
}

impl EmbedderTag {
    fn of(embedder: &dyn EmbeddingProvider) -> Self {
        Self {
            provider: embedder.provider_name().to_string(),
            dimensions: embedder.dimensions(),
        }
    }
}

#[derive(Debug, Default)]
struct IndexState {
    entries: Vec<IndexedChunk>,
    built_with: Option<EmbedderTag>,
}

/// Chunk index persisted in a single SQLite file.
pub struct SqliteIndex {
    path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
    conn: Mutex<Option<Connection>>,
    state: RwLock<IndexState>,
}

impl SqliteIndex {
    /// Open the index at `path`. A missing file gives an empty index and
    /// nothing is created until the first `add`.
    pub fn open(path: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let path = path.into();

        let (conn, state) = if path.exists() {
            let conn = open_connection(&path)?;
            let entries = load_entries(&conn)?;
            // Rows written without a meta record: take the size from the vectors.
            let built_with = load_embedder_tag(&conn)?.or_else(|| {
                entries.first().map(|e| EmbedderTag {
                    provider: embedder.provider_name().to_string(),
                    dimensions: e.embedding.len(),
                })
            });
            tracing::info!("Opened index at {:?} ({} chunks)", path, entries.len());
            (Some(conn), IndexState { entries, built_with })
        } else {
            tracing::info!("No index at {:?}; starting empty", path);
            (None, IndexState::default())
        };

        if let Err(e) = check_embedder(state.built_with.as_ref(), embedder.as_ref()) {
            tracing::warn!("{}", e);
        }

        Ok(Self {
            path,
            embedder,
            conn: Mutex::new(conn),
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl VectorIndex for SqliteIndex {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let state = self.state.read().await;
        check_embedder(state.built_with.as_ref(), self.embedder.as_ref())?;
        let entries = &state.entries;

        let mut results: Vec<ScoredChunk> = entries
            .iter()
            .map(|e| ScoredChunk::new(e.chunk.clone(), cosine_similarity(&query_embedding, &e.embedding)))
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} chunks (requested top-{}, {} indexed)",
            results.len(),
            k,
            entries.len()
        );

        Ok(results)
    }

    async fn add(&self, chunks: &[Chunk]) -> AppResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(AppError::Knowledge(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut state = self.state.write().await;
        check_embedder(state.built_with.as_ref(), self.embedder.as_ref())?;
        let mut guard = self.conn.lock().await;

        if guard.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Knowledge(format!("Failed to create index directory: {}", e))
                })?;
            }
            *guard = Some(open_connection(&self.path)?);
        }
        let conn = guard
            .as_mut()
            .ok_or_else(|| AppError::Knowledge("Index connection unavailable".to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| AppError::Knowledge(format!("Failed to begin transaction: {}", e)))?;
        for (chunk, embedding) in chunks.iter().zip(&embeddings) {
            let metadata = serde_json::to_string(&chunk.metadata)?;
            tx.execute(
                "INSERT OR REPLACE INTO chunks (id, text, embedding, metadata) VALUES (?1, ?2, ?3, ?4)",
                params![chunk.id, chunk.text, embedding_to_bytes(embedding), metadata],
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to insert chunk: {}", e)))?;
        }
        let tag = EmbedderTag::of(self.embedder.as_ref());
        for (key, value) in [
            (META_EMBEDDER, tag.provider.clone()),
            (META_DIMENSIONS, tag.dimensions.to_string()),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to record embedder: {}", e)))?;
        }
        tx.commit()
            .map_err(|e| AppError::Knowledge(format!("Failed to commit chunks: {}", e)))?;

        state.built_with = Some(tag);
        let entries = &mut state.entries;
        let new_ids: HashSet<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        entries.retain(|e| !new_ids.contains(e.chunk.id.as_str()));
        entries.extend(
            chunks
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| IndexedChunk { chunk, embedding }),
        );

        tracing::info!("Added {} chunks to index ({} total)", chunks.len(), entries.len());
        Ok(chunks.len())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        let guard = self.conn.lock().await;

        if let Some(conn) = guard.as_ref() {
            conn.execute_batch("DELETE FROM chunks; DELETE FROM meta;")
                .map_err(|e| AppError::Knowledge(format!("Failed to delete chunks: {}", e)))?;
        }
        *state = IndexState::default();

        tracing::info!("Cleared index at {:?}", self.path);
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn stats(&self) -> AppResult<IndexStats> {
        let state = self.state.read().await;
        let entries = &state.entries;
        let sources: HashSet<&str> = entries
            .iter()
            .filter_map(|e| e.chunk.metadata.source.as_deref())
            .collect();

        Ok(IndexStats {
            path: self.path.clone(),
            exists: self.exists(),
            sources_count: sources.len(),
            chunks_count: entries.len(),
        })
    }
}

fn open_connection(path: &Path) -> AppResult<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to open SQLite index: {}", e)))?;
    conn.execute_batch(SCHEMA)
        .map_err(|e| AppError::Knowledge(format!("Failed to create tables: {}", e)))?;
    Ok(conn)
}

fn load_entries(conn: &Connection) -> AppResult<Vec<IndexedChunk>> {
    let mut stmt = conn
        .prepare("SELECT id, text, embedding, metadata FROM chunks ORDER BY rowid")
        .map_err(|e| AppError::Knowledge(format!("Failed to prepare query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })
        .map_err(|e| AppError::Knowledge(format!("Failed to query chunks: {}", e)))?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, text, blob, metadata) =
            row.map_err(|e| AppError::Knowledge(format!("Failed to read chunk: {}", e)))?;

        let Some(embedding) = bytes_to_embedding(&blob) else {
            tracing::warn!("Skipping chunk {} with malformed embedding", id);
            continue;
        };

        entries.push(IndexedChunk {
            chunk: Chunk {
                id,
                text,
                metadata: ChunkMetadata::from_json_lenient(metadata.as_deref()),
            },
            embedding,
        });
    }

    Ok(entries)
}

fn load_embedder_tag(conn: &Connection) -> AppResult<Option<EmbedderTag>> {
    let read = |key: &str| -> AppResult<Option<String>> {
        conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(|e| AppError::Knowledge(format!("Failed to read index meta: {}", e)))
    };

    let (Some(provider), Some(dimensions)) = (read(META_EMBEDDER)?, read(META_DIMENSIONS)?) else {
        return Ok(None);
    };
    let dimensions = dimensions.parse().map_err(|_| {
        AppError::Knowledge(format!("Invalid dimensions in index meta: '{}'", dimensions))
    })?;

    Ok(Some(EmbedderTag { provider, dimensions }))
}

/// An index holding vectors from another embedder cannot be searched or
/// extended; the scores would be meaningless.
fn check_embedder(built_with: Option<&EmbedderTag>, embedder: &dyn EmbeddingProvider) -> AppResult<()> {
    let current = EmbedderTag::of(embedder);
    match built_with {
        Some(stored) if *stored != current => Err(AppError::Knowledge(format!(
            "Index was built with '{}' embeddings ({} dimensions) but the configured embedder is '{}' ({} dimensions). \
             Run 'fundqa knowledge learn --reset' to rebuild it.",
            stored.provider, stored.dimensions, current.provider, current.dimensions
        ))),
        _ => Ok(()),
    }
}

fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

/// Cosine similarity; mismatched or zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
