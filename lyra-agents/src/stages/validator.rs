//! Validator: strictly subtractive grounding check on the draft.
//!
//! The validator may delete or rewrite unsupported sentences but never
//! adds a theme or quote absent from the draft or evidence. Pairing it
//! with the purely stylistic editor keeps truth-checking and style
//! independently auditable: polish can never reintroduce unsupported
//! content.

use tracing::info;

use lyra_core::Llm;

use crate::error::{AgentError, Result};
use crate::state::PipelineState;

const SYSTEM: &str = "You are a strict validator.

You will be given a draft report and the evidence items (JSON) it must be
grounded in.

Goal:
- Remove or rewrite any sentence or quote that is not supported by the evidence.
- Do NOT add new themes or new quotes.
- If a section has no supportable content, delete the section entirely; never
  leave an empty heading.

Output format:
## Issues removed
- bullet list of removed or changed claims (write \"- none\" if nothing was removed)

## Validated report
(full markdown report)";

const ISSUES_HEADING: &str = "## Issues removed";
const REPORT_HEADING: &str = "## Validated report";

/// Split validator output into the removed-claims list and the report.
///
/// Generated structure is not guaranteed: when the headings are absent the
/// whole output is treated as the validated report with no removals
/// recorded, which degrades gracefully instead of dropping the report.
pub fn split_validator_output(raw: &str) -> (Vec<String>, String) {
    let Some(report_at) = raw.find(REPORT_HEADING) else {
        return (Vec::new(), raw.trim().to_string());
    };

    let head = &raw[..report_at];
    let report = raw[report_at + REPORT_HEADING.len()..].trim().to_string();

    let removed: Vec<String> = head
        .find(ISSUES_HEADING)
        .map(|at| &head[at + ISSUES_HEADING.len()..])
        .unwrap_or("")
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).to_string())
        .filter(|line| !line.is_empty() && line != "none")
        .collect();

    (removed, report)
}

/// Run the validator: populates `state.validated_report` and logs every
/// removed claim.
pub async fn run(llm: &dyn Llm, state: &mut PipelineState) -> Result<()> {
    let draft = state.draft_report.as_deref().ok_or(AgentError::MissingState("draft_report"))?;
    let evidence_json = serde_json::to_string(&state.evidence)
        .map_err(|e| AgentError::Internal(format!("failed to serialize evidence: {e}")))?;

    let user = format!(
        "Draft report:\n{draft}\n\nEvidence items (JSON):\n{evidence_json}\n\nValidate now."
    );
    let raw = llm.generate(SYSTEM, &user).await?;

    let (removed, validated) = split_validator_output(&raw);
    info!(removed = removed.len(), "validation pass completed");
    for claim in &removed {
        state.push_log("validator", format!("removed: {claim}"));
    }
    state.push_log("validator", format!("validation pass completed, {} removals", removed.len()));
    state.validated_report = Some(validated);
    Ok(())
}
