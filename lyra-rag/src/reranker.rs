//! Query-aware reranking of fused candidates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, warn};

use lyra_core::Llm;

use crate::document::ScoredChunk;
use crate::error::Result;

/// Re-scores a candidate set against the query.
///
/// Implementations score each (query, candidate-text) pair jointly, which
/// is strictly more accurate than either first-stage retriever's own score
/// because it conditions on the actual query text rather than a
/// precomputed embedding.
///
/// Implementations must return the candidates in their input order with
/// updated scores; the caller performs the final stable sort so that ties
/// fall back to fusion rank deterministically.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Re-score the candidates against the query, preserving input order.
    async fn rerank(&self, query: &str, candidates: Vec<ScoredChunk>) -> Result<Vec<ScoredChunk>>;
}

/// A reranker that leaves scores untouched.
///
/// With it, the final ordering is exactly the fusion ordering. Used in
/// tests and as a degraded mode when no generation capability is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(&self, _query: &str, candidates: Vec<ScoredChunk>) -> Result<Vec<ScoredChunk>> {
        Ok(candidates)
    }
}

const SCORING_SYSTEM: &str = "You judge whether a lyric passage is relevant to a search query.
Reply with a single integer from 0 (irrelevant) to 10 (highly relevant). No other text.";

/// Per-pair scoring timeout.
const PAIR_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of pairs scored concurrently.
const DEFAULT_CONCURRENCY: usize = 4;

/// A cross-encoder-style reranker backed by the generation capability.
///
/// Each (query, candidate) pair is scored jointly with a bounded-concurrency
/// fan-out and a per-call timeout. A pair whose scoring call fails or times
/// out keeps its fusion score instead of failing the whole retrieval — a
/// degraded ordering beats no results.
pub struct LlmReranker {
    llm: Arc<dyn Llm>,
    concurrency: usize,
}

impl LlmReranker {
    /// Create a reranker scoring pairs with the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm, concurrency: DEFAULT_CONCURRENCY }
    }

    /// Override how many pairs are scored concurrently.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn score_pair(&self, query: &str, candidate: &ScoredChunk) -> Option<f32> {
        let user = format!("Query:\n{query}\n\nPassage:\n{}", candidate.chunk.text);

        let reply =
            tokio::time::timeout(PAIR_TIMEOUT, self.llm.generate(SCORING_SYSTEM, &user)).await;

        match reply {
            Ok(Ok(text)) => parse_score(&text),
            Ok(Err(e)) => {
                warn!(chunk = %candidate.chunk.id, error = %e, "rerank scoring failed");
                None
            }
            Err(_) => {
                warn!(chunk = %candidate.chunk.id, "rerank scoring timed out");
                None
            }
        }
    }
}

/// Parse the leading integer out of a scoring reply, clamped to 0–10.
fn parse_score(reply: &str) -> Option<f32> {
    let digits: String =
        reply.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: u32 = digits.parse().ok()?;
    Some(value.min(10) as f32 / 10.0)
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(&self, query: &str, candidates: Vec<ScoredChunk>) -> Result<Vec<ScoredChunk>> {
        debug!(candidates = candidates.len(), "reranking");

        // `buffered` preserves input order while bounding concurrency.
        let scored: Vec<ScoredChunk> = stream::iter(candidates)
            .map(|candidate| async move {
                match self.score_pair(query, &candidate).await {
                    Some(score) => ScoredChunk { score, ..candidate },
                    None => candidate,
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_decorated_integers() {
        assert_eq!(parse_score("7"), Some(0.7));
        assert_eq!(parse_score(" 10 "), Some(1.0));
        assert_eq!(parse_score("3/10"), Some(0.3));
        assert_eq!(parse_score("42"), Some(1.0)); // clamped
    }

    #[test]
    fn rejects_non_numeric_replies() {
        assert_eq!(parse_score("highly relevant"), None);
        assert_eq!(parse_score(""), None);
    }
}
