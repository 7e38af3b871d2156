//! Error types shared across the Lyra workspace.

use thiserror::Error;

/// Errors produced by core components and model clients.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required configuration value is missing or invalid.
    ///
    /// Fatal at startup: nothing should be retrieved or generated when
    /// configuration is incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation capability failed or timed out.
    ///
    /// Raised only after any retry budget is exhausted. Callers must treat
    /// this as fatal for the current run rather than substituting content.
    #[error("Model error ({model}): {message}")]
    Model {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
