//! Offline ingestion of pre-extracted documents into the index.
//!
//! Input is JSONL: one `SourceDocument` per line. Directories are walked
//! for `.jsonl` files.

use crate::chunker;
use crate::types::{Chunk, ChunkMetadata, LearnStats, SourceDocument};
use crate::vector_index::VectorIndex;
use fundqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Options for a learn run.
#[derive(Debug, Clone)]
pub struct LearnOptions {
    pub paths: Vec<PathBuf>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Clear the index before adding.
    pub reset: bool,
}

impl LearnOptions {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            chunk_size: 1000,
            chunk_overlap: 200,
            reset: false,
        }
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// Read every input file, chunk each document and add the chunks to `index`.
pub async fn learn(index: &dyn VectorIndex, options: &LearnOptions) -> AppResult<LearnStats> {
    let start = Instant::now();

    if options.chunk_size == 0 || options.chunk_overlap >= options.chunk_size {
        return Err(AppError::Config(format!(
            "Invalid chunking: size {} overlap {}",
            options.chunk_size, options.chunk_overlap
        )));
    }

    let files = collect_files(&options.paths)?;
    if files.is_empty() {
        return Err(AppError::Knowledge(
            "No .jsonl input files found".to_string(),
        ));
    }

    if options.reset {
        tracing::info!("Resetting index before learning");
        index.clear().await?;
    }

    let mut stats = LearnStats::default();

    for file in &files {
        let (documents, skipped) = read_documents(file)?;
        stats.files_count += 1;
        stats.documents_count += documents.len();
        stats.skipped_count += skipped;

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| document_chunks(doc, options))
            .collect();

        stats.chunks_count += index.add(&chunks).await?;

        tracing::debug!(
            "Processed {:?}: {} documents, {} chunks, {} skipped lines",
            file,
            documents.len(),
            chunks.len(),
            skipped
        );
    }

    stats.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "Learn completed: {} files, {} documents, {} chunks in {:.2}s",
        stats.files_count,
        stats.documents_count,
        stats.chunks_count,
        stats.duration_secs
    );

    Ok(stats)
}

fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && is_jsonl(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            return Err(AppError::Knowledge(format!(
                "Input path does not exist: {}",
                path.display()
            )));
        }
    }

    Ok(files)
}

fn is_jsonl(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jsonl"))
        .unwrap_or(false)
}

/// Parse a JSONL file. Returns the documents and the number of lines skipped.
fn read_documents(path: &Path) -> AppResult<(Vec<SourceDocument>, usize)> {
    let content = std::fs::read_to_string(path)?;
    let mut documents = Vec::new();
    let mut skipped = 0;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<SourceDocument>(line) {
            Ok(doc) if doc.text.trim().is_empty() => {
                tracing::warn!("{}:{}: document has no text, skipping", path.display(), line_no + 1);
                skipped += 1;
            }
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!("{}:{}: {}", path.display(), line_no + 1, e);
                skipped += 1;
            }
        }
    }

    Ok((documents, skipped))
}

fn document_chunks(doc: &SourceDocument, options: &LearnOptions) -> Vec<Chunk> {
    let metadata = ChunkMetadata {
        source: Some(doc.url.clone()),
        scheme: doc.scheme.clone(),
        description: doc.description.clone(),
    };

    chunker::chunk_text(&doc.text, options.chunk_size, options.chunk_overlap)
        .into_iter()
        .map(|text| Chunk::new(text, metadata.clone()))
        .collect()
}
