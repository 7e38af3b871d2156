//! The persisted chunk index.
//!
//! One index holds the full chunk set and serves both search modes the
//! hybrid retriever needs: nearest-neighbor by embedding similarity and
//! BM25 term overlap. Building is an explicit offline step; query-time
//! load fails clearly when no index has been built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::document::{Chunk, Document, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::lexical::LexicalIndex;

/// File holding the serialized chunks inside the persist directory.
const CHUNKS_FILE: &str = "chunks.json";
/// File holding the index metadata inside the persist directory.
const META_FILE: &str = "meta.json";

/// Chunks are embedded in batches of this size during the build.
const EMBED_BATCH_SIZE: usize = 64;

/// Metadata recorded alongside the persisted chunks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexMeta {
    /// Identifier of the embedding model used at build time. Queries must
    /// use the same model; a mismatch silently degrades retrieval quality.
    pub embed_model: String,
    /// Dimensionality of the stored embeddings.
    pub dimensions: usize,
    /// Number of chunks in the index.
    pub chunk_count: usize,
}

/// A chunk set supporting vector and lexical search over the same chunks.
#[derive(Debug)]
pub struct ChunkIndex {
    chunks: Vec<Chunk>,
    lexical: LexicalIndex,
    meta: IndexMeta,
}

impl ChunkIndex {
    /// Build an index from documents: chunk, embed, index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if embedding fails, or
    /// [`RagError::Index`] if the embedder returns a short batch.
    pub async fn build(
        documents: &[Document],
        chunker: &dyn Chunker,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        let mut chunks: Vec<Chunk> = Vec::new();
        for document in documents {
            chunks.extend(chunker.chunk(document));
        }

        for batch_start in (0..chunks.len()).step_by(EMBED_BATCH_SIZE) {
            let batch_end = (batch_start + EMBED_BATCH_SIZE).min(chunks.len());
            let texts: Vec<&str> =
                chunks[batch_start..batch_end].iter().map(|c| c.text.as_str()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;
            if embeddings.len() != texts.len() {
                return Err(RagError::Index(format!(
                    "embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    texts.len()
                )));
            }
            for (chunk, embedding) in chunks[batch_start..batch_end].iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        let meta = IndexMeta {
            embed_model: embedder.model_id().to_string(),
            dimensions: embedder.dimensions(),
            chunk_count: chunks.len(),
        };

        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            embed_model = %meta.embed_model,
            "built chunk index"
        );

        Ok(Self::from_parts(chunks, meta))
    }

    fn from_parts(chunks: Vec<Chunk>, meta: IndexMeta) -> Self {
        let lexical = LexicalIndex::build(chunks.iter().map(|c| c.text.as_str()));
        Self { chunks, lexical, meta }
    }

    /// Persist the index under `dir` (created if absent).
    ///
    /// Layout: `meta.json` plus `chunks.json`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] on I/O or serialization failure.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| RagError::Index(format!("failed to create {dir:?}: {e}")))?;

        let meta_json = serde_json::to_string_pretty(&self.meta)
            .map_err(|e| RagError::Index(format!("failed to serialize metadata: {e}")))?;
        fs::write(dir.join(META_FILE), meta_json)
            .map_err(|e| RagError::Index(format!("failed to write metadata: {e}")))?;

        let chunks_json = serde_json::to_string(&self.chunks)
            .map_err(|e| RagError::Index(format!("failed to serialize chunks: {e}")))?;
        fs::write(dir.join(CHUNKS_FILE), chunks_json)
            .map_err(|e| RagError::Index(format!("failed to write chunks: {e}")))?;

        info!(?dir, chunks = self.chunks.len(), "persisted chunk index");
        Ok(())
    }

    /// Load a previously persisted index from `dir`.
    ///
    /// The lexical index is rebuilt in memory from the stored chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexNotBuilt`] when the directory or its files
    /// are absent (the build step has not been run), or [`RagError::Index`]
    /// when the stored files cannot be parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let meta_path = dir.join(META_FILE);
        let chunks_path = dir.join(CHUNKS_FILE);
        if !meta_path.is_file() || !chunks_path.is_file() {
            return Err(RagError::IndexNotBuilt { dir: dir.to_path_buf() });
        }

        let meta_json = fs::read_to_string(&meta_path)
            .map_err(|e| RagError::Index(format!("failed to read {meta_path:?}: {e}")))?;
        let meta: IndexMeta = serde_json::from_str(&meta_json)
            .map_err(|e| RagError::Index(format!("failed to parse {meta_path:?}: {e}")))?;

        let chunks_json = fs::read_to_string(&chunks_path)
            .map_err(|e| RagError::Index(format!("failed to read {chunks_path:?}: {e}")))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&chunks_json)
            .map_err(|e| RagError::Index(format!("failed to parse {chunks_path:?}: {e}")))?;

        if chunks.len() != meta.chunk_count {
            warn!(
                stored = chunks.len(),
                expected = meta.chunk_count,
                "chunk count disagrees with metadata"
            );
        }

        info!(?dir, chunks = chunks.len(), embed_model = %meta.embed_model, "loaded chunk index");
        Ok(Self::from_parts(chunks, meta))
    }

    /// The metadata recorded at build time.
    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Nearest-neighbor search by cosine similarity.
    ///
    /// Returns up to `limit` chunks ordered by descending similarity.
    pub fn vector_search(&self, embedding: &[f32], limit: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// BM25 term-overlap search.
    ///
    /// Returns up to `limit` chunks ordered by descending BM25 score;
    /// chunks sharing no term with the query are omitted.
    pub fn lexical_search(&self, query: &str, limit: usize) -> Vec<ScoredChunk> {
        self.lexical
            .search(query, limit)
            .into_iter()
            .map(|(ordinal, score)| ScoredChunk { chunk: self.chunks[ordinal].clone(), score })
            .collect()
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
