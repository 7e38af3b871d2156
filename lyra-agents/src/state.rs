//! The shared state threaded through the pipeline.
//!
//! The state is the contract between stages: each stage reads the fields
//! it needs and writes only the fields it owns. Keeping it an explicit,
//! inspectable record (rather than hiding intermediate products in
//! closures) is what lets any stage run in isolation against a
//! hand-constructed prior state.

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceItem;

/// Mutable record threaded through the pipeline stages.
///
/// Field ownership: `sub_tasks` — planner; `evidence` — researcher;
/// `analysis` — analyst; `draft_report` — writer; `validated_report` —
/// validator; `final_report` — editor. No stage overwrites a field owned
/// by an earlier stage. `logs` is append-only and private; stages append
/// through [`push_log`](PipelineState::push_log).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    /// The original research question.
    pub question: String,
    /// Planner output: retrieval-phrased sub-queries, in plan order.
    pub sub_tasks: Vec<String>,
    /// Researcher output. Downstream stages treat this as a set; ordering
    /// carries no meaning.
    pub evidence: Vec<EvidenceItem>,
    /// Analyst output.
    pub analysis: Option<String>,
    /// Writer output.
    pub draft_report: Option<String>,
    /// Validator output: the draft with unsupported content removed.
    pub validated_report: Option<String>,
    /// Editor output: the stylistically polished validated report.
    pub final_report: Option<String>,
    /// Append-only diagnostic trace. Every skip and recovery lands here
    /// so grounding failures stay auditable after the run.
    logs: Vec<String>,
}

impl PipelineState {
    /// Create the initial state for a run: only the question, empty logs.
    pub fn new(question: impl Into<String>) -> Self {
        Self { question: question.into(), ..Self::default() }
    }

    /// Append one diagnostic line, prefixed with the originating stage.
    pub fn push_log(&mut self, stage: &str, message: impl AsRef<str>) {
        self.logs.push(format!("[{stage}] {}", message.as_ref()));
    }

    /// The diagnostic trace accumulated so far.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}
