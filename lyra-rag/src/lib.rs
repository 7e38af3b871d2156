//! # lyra-rag
//!
//! Retrieval layer for the Lyra grounded research pipeline.
//!
//! The crate turns a flat lyrics corpus into a persisted [`ChunkIndex`]
//! (overlapping passages with embeddings plus a BM25 inverted index) and
//! answers queries through a [`HybridRetriever`]: over-fetched dense and
//! sparse candidate lists, reciprocal-rank fusion, and a query-aware
//! rerank down to the requested top-k.
//!
//! # Offline build vs. query time
//!
//! ```rust,ignore
//! // Offline, once:
//! let docs = corpus::parse_corpus(&raw);
//! let index = ChunkIndex::build(&docs, &chunker, embedder.as_ref()).await?;
//! index.persist(&dir)?;
//!
//! // Query time:
//! let index = cache::load_or_init(&dir).await?;
//! let retriever = HybridRetriever::new(index, embedder, reranker);
//! let chunks = retriever.retrieve("find lyrics about loneliness", 5).await?;
//! ```

pub mod cache;
pub mod chunking;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
mod lexical;
pub mod openai;
pub mod reranker;
pub mod retriever;

mod index;

pub use chunking::{Chunker, FixedSizeChunker};
pub use document::{Chunk, Document, RetrievedChunk, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{ChunkIndex, IndexMeta};
pub use openai::OpenAIEmbeddingProvider;
pub use reranker::{LlmReranker, NoOpReranker, Reranker};
pub use retriever::{HybridRetriever, Retriever, format_context};
