//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to fixed-length numeric vectors.
///
/// The same model must be used at index-build time and at query time; a
/// silent version mismatch degrades retrieval quality, so the provider
/// exposes its model identifier and the index records it alongside the
/// persisted chunks.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially; backends with native batching should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Dimensionality of the produced embeddings.
    fn dimensions(&self) -> usize;

    /// Identifier of the embedding model, recorded with the persisted index.
    fn model_id(&self) -> &str;
}
