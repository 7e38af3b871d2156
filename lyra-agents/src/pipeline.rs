//! The research pipeline: plan, research, analyze, write, validate, edit.

use std::sync::Arc;

use tracing::info;

use lyra_core::Llm;
use lyra_rag::Retriever;

use crate::error::Result;
use crate::stages::{analyst, editor, planner, researcher, validator, writer};
use crate::state::PipelineState;

/// Drives a full research run over a retrieval backend.
///
/// All six stages share one generation client and one retriever; the
/// intermediate products of a run live in the returned [`PipelineState`],
/// not in the pipeline itself, so a single pipeline can serve concurrent
/// runs.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = ResearchPipeline::new(llm, retriever);
/// let state = pipeline.run("How do water and weather imagery evolve?").await?;
/// println!("{}", state.final_report.as_deref().unwrap_or(""));
/// ```
pub struct ResearchPipeline {
    llm: Arc<dyn Llm>,
    retriever: Arc<dyn Retriever>,
}

impl ResearchPipeline {
    pub fn new(llm: Arc<dyn Llm>, retriever: Arc<dyn Retriever>) -> Self {
        Self { llm, retriever }
    }

    /// Run every stage in order and return the completed state.
    ///
    /// On success `final_report` is always populated. An evidence set that
    /// ends up empty does not abort the run; the synthesis stages are
    /// instructed to report the gap rather than invent coverage.
    ///
    /// # Errors
    ///
    /// Fails when the generation client or the retrieval layer fails in a
    /// way a stage cannot contain; see [`AgentError`](crate::AgentError).
    pub async fn run(&self, question: &str) -> Result<PipelineState> {
        info!(question, "pipeline run starting");
        let mut state = PipelineState::new(question);

        planner::run(self.llm.as_ref(), &mut state).await?;
        researcher::run(self.llm.as_ref(), self.retriever.as_ref(), &mut state).await?;
        analyst::run(self.llm.as_ref(), &mut state).await?;
        writer::run(self.llm.as_ref(), &mut state).await?;
        validator::run(self.llm.as_ref(), &mut state).await?;
        editor::run(self.llm.as_ref(), &mut state).await?;

        info!(log_lines = state.logs().len(), "pipeline run finished");
        Ok(state)
    }
}
