//! Error types for the `lyra-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// No persisted index exists at the configured location.
    ///
    /// The index is built in a separate, explicit offline step; query-time
    /// load fails clearly instead of silently rebuilding.
    #[error("no persisted index at {dir:?}; run `lyra build-index` first")]
    IndexNotBuilt {
        /// The directory that was expected to hold the index.
        dir: PathBuf,
    },

    /// The persisted index could not be read or written.
    #[error("Index error: {0}")]
    Index(String),

    /// A caller requested a non-positive number of results.
    ///
    /// Rejected rather than returning an empty result, because silent
    /// success would mask caller bugs.
    #[error("invalid top-k {0}: must be at least 1")]
    InvalidTopK(usize),

    /// An error propagated from the generation capability.
    #[error(transparent)]
    Core(#[from] lyra_core::CoreError),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
