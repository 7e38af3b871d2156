//! Hybrid retriever contract tests: cardinality, over-fetch, edge cases.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lyra_rag::{
    ChunkIndex, Document, EmbeddingProvider, FixedSizeChunker, HybridRetriever, NoOpReranker,
    RagError, Reranker, Result as RagResult, Retriever, ScoredChunk,
};

/// Deterministic letter-frequency embedder; see index_tests.rs.
struct HistogramEmbedder;

fn histogram(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    for c in text.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_ascii_lowercase() {
            v[(c as u8 - b'a') as usize] += 1.0;
        }
    }
    v
}

#[async_trait]
impl EmbeddingProvider for HistogramEmbedder {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        Ok(histogram(text))
    }

    fn dimensions(&self) -> usize {
        26
    }

    fn model_id(&self) -> &str {
        "histogram-test"
    }
}

/// Instrumented reranker: records how many candidates each call receives,
/// passes scores through untouched.
#[derive(Default)]
struct CountingReranker {
    pool_sizes: Mutex<Vec<usize>>,
}

impl CountingReranker {
    fn observed(&self) -> Vec<usize> {
        self.pool_sizes.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Reranker for CountingReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: Vec<ScoredChunk>,
    ) -> RagResult<Vec<ScoredChunk>> {
        if let Ok(mut sizes) = self.pool_sizes.lock() {
            sizes.push(candidates.len());
        }
        Ok(candidates)
    }
}

/// Build an index of `n` single-chunk documents with distinct vocabulary.
async fn index_with_n_chunks(n: usize) -> Arc<ChunkIndex> {
    let words = [
        "love", "rain", "sun", "night", "road", "home", "blue", "gold", "dream", "weight",
        "river", "garden", "window", "letter", "winter", "summer", "shadow", "silver", "morning",
        "evening", "castle", "ocean", "mountain", "valley", "thunder", "whisper", "mirror",
        "candle", "harbor", "meadow", "velvet", "crystal", "ember", "willow", "clover", "maple",
        "pebble", "lantern", "orchard", "bramble",
    ];
    let docs: Vec<Document> = (0..n)
        .map(|i| {
            let word = words[i % words.len()];
            Document {
                text: format!("a song about {word} and {word} again, number {i}"),
                song: format!("Song {i}"),
                album: "Test".into(),
                source_path: format!("lyrics/Test/Song_{i}.txt"),
            }
        })
        .collect();

    let chunker = FixedSizeChunker::new(800, 150);
    Arc::new(ChunkIndex::build(&docs, &chunker, &HistogramEmbedder).await.expect("build"))
}

#[tokio::test]
async fn returns_exactly_k_when_pool_is_large_enough() {
    let index = index_with_n_chunks(40).await;
    let retriever = HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::new(NoOpReranker));

    let results = retriever.retrieve("a song about rain", 5).await.expect("retrieve");
    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn never_returns_more_than_k() {
    let index = index_with_n_chunks(12).await;
    let retriever = HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::new(NoOpReranker));

    for k in [1, 3, 8, 50] {
        let results = retriever.retrieve("love and rain", k).await.expect("retrieve");
        assert!(results.len() <= k);
    }
}

#[tokio::test]
async fn reranker_receives_the_over_fetched_pool() {
    let index = index_with_n_chunks(40).await;
    let total_chunks = index.len();
    let reranker = Arc::new(CountingReranker::default());
    let retriever =
        HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::clone(&reranker) as Arc<dyn Reranker>);

    for k in [1, 5, 8] {
        retriever.retrieve("a song about rain", k).await.expect("retrieve");
    }

    let expected_pool = |k: usize| (6 * k).max(30).min(total_chunks);
    let observed = reranker.observed();
    assert_eq!(observed.len(), 3);
    for (k, pool) in [1, 5, 8].into_iter().zip(observed) {
        assert!(
            pool >= expected_pool(k),
            "rerank pool for k={k} was {pool}, expected at least {}",
            expected_pool(k)
        );
        assert!(pool <= total_chunks);
    }
}

#[tokio::test]
async fn zero_k_is_rejected() {
    let index = index_with_n_chunks(4).await;
    let retriever = HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::new(NoOpReranker));

    let err = retriever.retrieve("anything", 0).await.expect_err("k=0 must error");
    assert!(matches!(err, RagError::InvalidTopK(0)));
}

#[tokio::test]
async fn empty_index_returns_empty_not_error() {
    let chunker = FixedSizeChunker::new(800, 150);
    let index = Arc::new(ChunkIndex::build(&[], &chunker, &HistogramEmbedder).await.expect("build"));
    let retriever = HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::new(NoOpReranker));

    let results = retriever.retrieve("anything", 5).await.expect("retrieve");
    assert!(results.is_empty());
}

#[tokio::test]
async fn results_carry_attribution_metadata() {
    let index = index_with_n_chunks(6).await;
    let retriever = HybridRetriever::new(index, Arc::new(HistogramEmbedder), Arc::new(NoOpReranker));

    let results = retriever.retrieve("a song about dream", 3).await.expect("retrieve");
    for r in &results {
        assert!(r.song.starts_with("Song "));
        assert_eq!(r.album, "Test");
        assert!(r.source_path.starts_with("lyrics/Test/"));
        assert!(!r.text.is_empty());
    }
}
