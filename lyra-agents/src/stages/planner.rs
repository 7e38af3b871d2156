//! Planner: decompose the question into retrieval sub-queries.

use tracing::info;

use lyra_core::Llm;

use crate::error::Result;
use crate::state::PipelineState;

/// Hard cap on sub-tasks; plans beyond this are truncated.
const MAX_SUB_TASKS: usize = 5;

const SYSTEM: &str = "You are a planning agent for a song-lyrics-only corpus.

Break the user's question into 3-5 sub-tasks that are answerable using lyrics alone.

Rules:
- Each sub-task must be phrased like a retrieval query (start with \"Find lyrics about ...\")
- Avoid words like \"comprehensive\", \"all songs\", or \"entire catalogue\".
- Prefer specific themes (e.g. loneliness, memory, nature, jealousy, travel, money).
- Return ONLY a numbered list (1., 2., 3., ...). No extra text.";

/// Parse an enumerated list, accepting `1. task` and `1) task` forms.
fn parse_numbered_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let s = line.trim();
            let first = s.chars().next()?;
            if !first.is_ascii_digit() {
                return None;
            }
            let head: String = s.chars().take(4).collect();
            if head.contains(". ") || head.contains(") ") {
                Some(s.to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Parse the plan, falling back to plain lines when no numbered item is
/// found.
///
/// Generation is not format-guaranteed; models routinely return bulleted
/// lists despite the instruction, so zero parsed items degrades to
/// treating every non-empty line as one sub-task. Either way the plan is
/// truncated to [`MAX_SUB_TASKS`].
pub fn parse_plan(text: &str) -> Vec<String> {
    let mut tasks = parse_numbered_lines(text);
    if tasks.is_empty() {
        tasks = text
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).to_string())
            .filter(|line| !line.is_empty())
            .collect();
    }
    tasks.truncate(MAX_SUB_TASKS);
    tasks
}

/// Run the planner: populates `state.sub_tasks`.
pub async fn run(llm: &dyn Llm, state: &mut PipelineState) -> Result<()> {
    let user = format!("Research question:\n{}\n\nCreate the sub-tasks now.", state.question);
    let plan_text = llm.generate(SYSTEM, &user).await?;

    let sub_tasks = parse_plan(&plan_text);
    info!(sub_tasks = sub_tasks.len(), "plan produced");

    state.push_log("planner", &plan_text);
    state.sub_tasks = sub_tasks;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_list_with_dots_and_parens() {
        let text = "1. Find lyrics about loneliness\n2) Find lyrics about rain\n3. Find lyrics about travel";
        let tasks = parse_plan(text);
        assert_eq!(tasks.len(), 3);
        assert!(tasks[0].contains("loneliness"));
        assert!(tasks[1].contains("rain"));
    }

    #[test]
    fn falls_back_to_plain_lines_when_no_numbering_parses() {
        let text = "- Find lyrics about memory\n- Find lyrics about the sea\n\n- Find lyrics about money";
        let tasks = parse_plan(text);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0], "Find lyrics about memory");
    }

    #[test]
    fn fallback_is_truncated_to_five() {
        let text = "a\nb\nc\nd\ne\nf\ng";
        assert_eq!(parse_plan(text).len(), 5);
    }

    #[test]
    fn numbered_list_is_truncated_to_five() {
        let text = (1..=8).map(|i| format!("{i}. task {i}")).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_plan(&text).len(), 5);
    }

    #[test]
    fn ignores_prose_around_numbered_items() {
        let text = "Here is the plan:\n1. Find lyrics about night\n2. Find lyrics about dawn\nThat is all.";
        let tasks = parse_plan(text);
        assert_eq!(tasks.len(), 2);
    }
}
