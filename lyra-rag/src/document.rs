//! Data types for documents, chunks, and retrieval results.

use serde::{Deserialize, Serialize};

/// A unit of source content: one song's full lyric body plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The full lyric text. Never empty: empty-body blocks are dropped
    /// during parsing.
    pub text: String,
    /// Song title, derived from the corpus file name.
    pub song: String,
    /// Album, derived from the corpus path segment.
    pub album: String,
    /// Stable identifier: the literal path line from the corpus file,
    /// unique per document.
    pub source_path: String,
}

/// A contiguous sub-span of a [`Document`], sized for retrieval.
///
/// Provenance metadata is copied from the owning document, not referenced:
/// a chunk stays attributable even if the source document is later removed.
/// Chunks are immutable once created; the index owns them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `{document_id}#{chunk_index}`.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// The embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Song title, copied from the parent document.
    pub song: String,
    /// Album, copied from the parent document.
    pub album: String,
    /// Source path, copied from the parent document.
    pub source_path: String,
    /// The parent document's identifier (its source path).
    pub document_id: String,
}

/// A [`Chunk`] paired with a relevance score from a search stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The scored chunk.
    pub chunk: Chunk,
    /// Similarity or relevance score; higher is more relevant.
    pub score: f32,
}

/// The result of a retrieval operation, handed to consumers.
///
/// This is the single value type at the retrieval boundary: mandatory
/// fields, no index internals. Rank is the position in the returned
/// sequence. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    /// The chunk text.
    pub text: String,
    /// Song title for attribution.
    pub song: String,
    /// Album for attribution.
    pub album: String,
    /// Source path for attribution.
    pub source_path: String,
    /// Final relevance score after reranking.
    pub score: f32,
}

impl RetrievedChunk {
    /// Convert a scored index chunk into the retrieval-boundary type.
    pub(crate) fn from_scored(scored: ScoredChunk) -> Self {
        Self {
            text: scored.chunk.text,
            song: scored.chunk.song,
            album: scored.chunk.album,
            source_path: scored.chunk.source_path,
            score: scored.score,
        }
    }
}
