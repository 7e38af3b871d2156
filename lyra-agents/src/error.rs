//! Error types for the agent pipeline.

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-item and per-sub-task failures (malformed extraction output, empty
/// retrieval context) are contained and logged in the run's state, not
/// raised; only external-service exhaustion and retrieval-layer failures
/// surface here.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The generation capability failed for a stage.
    #[error(transparent)]
    Model(#[from] lyra_core::CoreError),

    /// The retrieval layer failed.
    #[error(transparent)]
    Retrieval(#[from] lyra_rag::RagError),

    /// A stage was invoked against a state missing a field an earlier
    /// stage was supposed to populate.
    #[error("pipeline state missing '{0}'; earlier stage did not run")]
    MissingState(&'static str),

    /// An unexpected internal failure (e.g. serializing state for a prompt).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, AgentError>;
