//! Researcher: retrieve context per sub-task and extract evidence items.

use futures::StreamExt;
use futures::stream;
use tracing::{info, warn};

use lyra_core::Llm;
use lyra_rag::{Retriever, format_context};

use crate::error::Result;
use crate::evidence::{self, EvidenceItem};
use crate::state::PipelineState;

/// Retrieval depth per sub-task. Wider than the direct-answer default
/// because this context feeds extraction, not display.
const RESEARCH_TOP_K: usize = 8;

/// How many sub-tasks run concurrently.
const SUB_TASK_CONCURRENCY: usize = 4;

const SYSTEM: &str = "You are a research agent extracting evidence from a song-lyrics corpus.

You will be given a research sub-task and context retrieved from the corpus.

Extract discrete evidence items supporting the sub-task. Return ONLY a JSON array,
no prose, where each element is an object:
  {\"task\": string, \"song\": string, \"quote\": string, \"theme\": string}

Rules:
- \"quote\" must be copied verbatim from the context. Never invent or paraphrase lyrics.
- \"song\" comes from the [SONG=...] header above the quoted passage.
- Keep quotes short (a phrase or a line).
- If the context contains nothing relevant, return [].";

/// The outcome of one sub-task, merged into the state after completion.
struct SubTaskResult {
    ordinal: usize,
    items: Vec<EvidenceItem>,
    logs: Vec<String>,
}

async fn run_sub_task(
    llm: &dyn Llm,
    retriever: &dyn Retriever,
    ordinal: usize,
    task: &str,
) -> Result<SubTaskResult> {
    let mut logs = Vec::new();

    let chunks = retriever.retrieve(task, RESEARCH_TOP_K).await?;
    let context = format_context(&chunks);
    if context.trim().is_empty() {
        // No usable context: skip generation entirely rather than waste a
        // call on empty input.
        warn!(task, "retrieval returned no context; skipping extraction");
        logs.push(format!("no context retrieved for {task:?}; skipped"));
        return Ok(SubTaskResult { ordinal, items: Vec::new(), logs });
    }

    let user = format!(
        "Sub-task:\n{task}\n\nRetrieved context:\n{context}\n\nExtract the evidence items now."
    );
    let raw = llm.generate(SYSTEM, &user).await?;

    let candidates = match evidence::parse_candidates(&raw) {
        Ok(candidates) => candidates,
        Err(reason) => {
            // Malformed output fails this sub-task only; the raw output is
            // preserved for diagnosis.
            warn!(task, %reason, "extraction output failed structural parsing");
            logs.push(format!(
                "extraction output unparseable for {task:?} ({reason}); raw output:\n{raw}"
            ));
            return Ok(SubTaskResult { ordinal, items: Vec::new(), logs });
        }
    };

    let mut items = Vec::new();
    for candidate in candidates {
        match evidence::validate_candidate(candidate, task, &context) {
            Ok(item) => items.push(item),
            Err(rejection) => {
                logs.push(format!("rejected candidate for {task:?}: {rejection}"));
            }
        }
    }

    logs.push(format!("{} evidence items for {task:?}", items.len()));
    Ok(SubTaskResult { ordinal, items, logs })
}

/// Run the researcher: populates `state.evidence`.
///
/// Sub-tasks are independent and run with bounded concurrency; each
/// sub-task's evidence and log lines are merged atomically after it
/// completes, in plan order, so the trace stays deterministic. Downstream
/// stages treat the evidence list as a set.
pub async fn run(
    llm: &dyn Llm,
    retriever: &dyn Retriever,
    state: &mut PipelineState,
) -> Result<()> {
    let tasks = state.sub_tasks.clone();

    let mut results: Vec<SubTaskResult> = stream::iter(tasks.iter().enumerate())
        .map(|(ordinal, task)| run_sub_task(llm, retriever, ordinal, task))
        .buffer_unordered(SUB_TASK_CONCURRENCY)
        .collect::<Vec<Result<SubTaskResult>>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    results.sort_by_key(|r| r.ordinal);

    let mut total = 0;
    for result in results {
        for line in result.logs {
            state.push_log("researcher", line);
        }
        total += result.items.len();
        state.evidence.extend(result.items);
    }

    info!(sub_tasks = tasks.len(), evidence = total, "research completed");
    state.push_log("researcher", format!("{total} evidence items across {} sub-tasks", tasks.len()));
    Ok(())
}
