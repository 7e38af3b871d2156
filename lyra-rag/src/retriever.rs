//! Hybrid retrieval: over-fetch, fuse, rerank, truncate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::document::{RetrievedChunk, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::ChunkIndex;
use crate::reranker::Reranker;

/// Reciprocal-rank-fusion smoothing constant (standard value).
const RRF_K: f32 = 60.0;

/// The retrieval seam consumed by the agent pipeline.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `k` chunks relevant to `query`, best first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>>;
}

/// Candidate pool size before reranking.
///
/// Over-fetch substantially more than requested so reranking has a
/// meaningfully larger pool than the final cut, independent of how small
/// `k` is.
pub(crate) fn candidate_pool_size(k: usize) -> usize {
    (6 * k).max(30)
}

/// Two-stage hybrid retriever over a [`ChunkIndex`].
///
/// Dense (vector) and sparse (BM25) candidate lists are fetched
/// independently, fused by reciprocal rank (no score-scale compatibility
/// assumed between the two retrievers), reranked with a query-aware
/// scorer, and truncated to the requested top-k.
pub struct HybridRetriever {
    index: Arc<ChunkIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    reranker: Arc<dyn Reranker>,
}

impl HybridRetriever {
    /// Create a retriever over the given index.
    pub fn new(
        index: Arc<ChunkIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        reranker: Arc<dyn Reranker>,
    ) -> Self {
        Self { index, embedder, reranker }
    }

    /// Fuse two ranked lists by reciprocal rank, deduplicating by chunk id.
    ///
    /// Each appearance contributes `1 / (RRF_K + rank)`; a chunk ranked
    /// well by both retrievers accumulates both contributions. The result
    /// is ordered by descending fused score.
    fn fuse(dense: Vec<ScoredChunk>, sparse: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
        let mut fused: HashMap<String, ScoredChunk> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for list in [dense, sparse] {
            for (rank, scored) in list.into_iter().enumerate() {
                let contribution = 1.0 / (RRF_K + rank as f32 + 1.0);
                match fused.get_mut(&scored.chunk.id) {
                    Some(existing) => existing.score += contribution,
                    None => {
                        order.push(scored.chunk.id.clone());
                        fused.insert(
                            scored.chunk.id.clone(),
                            ScoredChunk { chunk: scored.chunk, score: contribution },
                        );
                    }
                }
            }
        }

        let mut candidates: Vec<ScoredChunk> = order
            .into_iter()
            .filter_map(|id| fused.remove(&id))
            .collect();
        candidates
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        candidates
    }
}

#[async_trait]
impl Retriever for HybridRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(RagError::InvalidTopK(k));
        }
        if self.index.is_empty() {
            debug!("index is empty; returning no results");
            return Ok(Vec::new());
        }

        let candidate_k = candidate_pool_size(k);

        let query_embedding = self.embedder.embed(query).await?;
        let dense = self.index.vector_search(&query_embedding, candidate_k);
        let sparse = self.index.lexical_search(query, candidate_k);
        debug!(dense = dense.len(), sparse = sparse.len(), candidate_k, "first-stage retrieval");

        let candidates = Self::fuse(dense, sparse);

        // Rerankers return input order; the stable sort below makes ties
        // fall back to fusion rank.
        let mut reranked = self.reranker.rerank(query, candidates).await?;
        reranked
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        reranked.truncate(k);

        info!(query_len = query.len(), k, results = reranked.len(), "retrieval completed");
        Ok(reranked.into_iter().map(RetrievedChunk::from_scored).collect())
    }
}

/// Render retrieved chunks as a single prompt context string.
///
/// Each chunk gets an attribution header so downstream extraction can cite
/// song and source; chunks are separated by a `---` rule.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    let parts: Vec<String> = chunks
        .iter()
        .map(|c| {
            format!(
                "[SONG={} | ALBUM={} | SRC={}]\n{}",
                c.song,
                c.album,
                c.source_path,
                c.text.trim()
            )
        })
        .collect();
    parts.join("\n\n---\n\n")
}
