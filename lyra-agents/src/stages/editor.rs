//! Editor: purely stylistic polish of the validated report.

use tracing::info;

use lyra_core::Llm;

use crate::error::{AgentError, Result};
use crate::state::PipelineState;

const SYSTEM: &str = "You are an editor.

Input: a validated report.
Goal: improve clarity, reduce repetition, improve structure.

Rules:
- Do NOT add new claims, themes, or quotes.
- Do NOT remove caveats.
- Only rewrite for style and readability.

Return ONLY the final markdown report (no preamble).";

/// Run the editor: populates `state.final_report`.
pub async fn run(llm: &dyn Llm, state: &mut PipelineState) -> Result<()> {
    let validated =
        state.validated_report.as_deref().ok_or(AgentError::MissingState("validated_report"))?;

    let user = format!("Validated report:\n{validated}\n\nEdit for clarity now.");
    let final_report = llm.generate(SYSTEM, &user).await?;

    info!("edit pass completed");
    state.push_log("editor", "edit pass completed");
    state.final_report = Some(final_report);
    Ok(())
}
