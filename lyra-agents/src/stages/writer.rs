//! Writer: turn analysis plus evidence into a draft report.

use tracing::info;

use lyra_core::Llm;

use crate::error::{AgentError, Result};
use crate::state::PipelineState;

const SYSTEM: &str = "You are an executive brief writer.

Input: an analysis of themes/motifs in song lyrics, plus the evidence items
(JSON) the analysis is grounded in.
Output: a polished, readable report.

Rules:
- Use clear headings and bullets; keep it concise.
- Only quote lyric fragments that appear in the evidence items. Never invent
  or paraphrase lyrics.
- Every thematic section must carry at least one supporting quote with its
  song citation.
- A claim that cannot be supported by the evidence is omitted, not hedged
  and kept.

Return markdown with:
# Executive summary
# Key themes
# Motifs & imagery
# Caveats (data limits)";

/// Run the writer: populates `state.draft_report`.
pub async fn run(llm: &dyn Llm, state: &mut PipelineState) -> Result<()> {
    let analysis = state.analysis.as_deref().ok_or(AgentError::MissingState("analysis"))?;
    let evidence_json = serde_json::to_string(&state.evidence)
        .map_err(|e| AgentError::Internal(format!("failed to serialize evidence: {e}")))?;

    let user = format!(
        "Question:\n{}\n\nAnalysis:\n{analysis}\n\nEvidence items (JSON):\n{evidence_json}\n\nWrite the report now.",
        state.question
    );
    let draft = llm.generate(SYSTEM, &user).await?;

    info!("draft produced");
    state.push_log("writer", "draft produced");
    state.draft_report = Some(draft);
    Ok(())
}
