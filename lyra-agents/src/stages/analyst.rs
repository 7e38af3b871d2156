//! Analyst: synthesize themes and motifs from the evidence set.

use tracing::info;

use lyra_core::Llm;

use crate::error::{AgentError, Result};
use crate::state::PipelineState;

const SYSTEM: &str = "You are a senior analyst.

Input: evidence items (JSON) extracted from a song-lyrics corpus.
Output: a structured analysis of recurring themes and motifs.

Rules:
- Ground every claim in the evidence items; never invent lyrics.
- A theme counts as established only when at least two evidence items support it.
  Themes with a single supporting item must be flagged as weak, not presented
  as established.
- Where evidence is thin or absent, say so explicitly instead of inventing
  coverage.
- Prefer concise, high-signal bullets.

Return markdown with these sections:
# Themes
# Motifs & imagery
# Notable exceptions / outliers
# Evidence gaps";

/// Run the analyst: populates `state.analysis`.
pub async fn run(llm: &dyn Llm, state: &mut PipelineState) -> Result<()> {
    let evidence_json = serde_json::to_string(&state.evidence)
        .map_err(|e| AgentError::Internal(format!("failed to serialize evidence: {e}")))?;

    let user = format!(
        "Question:\n{}\n\nEvidence items (JSON):\n{evidence_json}\n\nWrite the analysis now.",
        state.question
    );
    let analysis = llm.generate(SYSTEM, &user).await?;

    info!(evidence = state.evidence.len(), "analysis produced");
    state.push_log("analyst", "analysis produced");
    state.analysis = Some(analysis);
    Ok(())
}
