//! The generation-capability seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Generation parameters applied to every call.
///
/// The pipeline pins temperature to zero so that evidence extraction and
/// report generation stay reproducible across runs, and caps output length
/// so a runaway generation cannot stall a stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature. Zero for reproducible pipelines.
    pub temperature: f32,
    /// Maximum number of generated tokens per call.
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.0, max_output_tokens: 1200 }
    }
}

/// A text-generation capability.
///
/// Implementations take a system instruction plus a user message and return
/// generated text. Every call is a blocking external-service call from the
/// pipeline's point of view: implementations must bound it with a timeout
/// and surface failures instead of hanging.
///
/// # Example
///
/// ```rust,ignore
/// use lyra_core::Llm;
///
/// let text = llm.generate("You are a planner.", "Plan this question.").await?;
/// ```
#[async_trait]
pub trait Llm: Send + Sync {
    /// A short identifier for the underlying model (used in logs and errors).
    fn name(&self) -> &str;

    /// Generate text from a system instruction and a user message.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}
