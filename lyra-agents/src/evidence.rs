//! Evidence items and the untrusted-output parse that produces them.
//!
//! Evidence items are the only permitted grounding unit for report
//! content. Extraction output is generated text, so this module treats it
//! as untrusted input: structural parsing with an explicit rejection
//! policy, and a verbatim-traceability check tying every accepted quote
//! back to the retrieved context it was extracted from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Sentinel used when the extraction cannot resolve a song title.
pub const UNKNOWN_SONG: &str = "Unknown";

fn unknown_song() -> String {
    UNKNOWN_SONG.to_string()
}

/// A discrete, verifiable unit of extracted evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceItem {
    /// The sub-task this item was extracted for.
    #[serde(default)]
    pub task: String,
    /// The song the quote comes from; `"Unknown"` when unresolvable.
    #[serde(default = "unknown_song")]
    pub song: String,
    /// A lyric fragment copied verbatim from the retrieved context.
    pub quote: String,
    /// The theme the quote evidences.
    #[serde(default)]
    pub theme: String,
}

/// Why a candidate object was rejected during validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The array element was not a JSON object.
    NotAnObject,
    /// The object carried no non-empty `quote` field.
    EmptyQuote,
    /// The quote is not verbatim-traceable to the retrieved context.
    NotInContext { quote: String },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "candidate is not a JSON object"),
            Self::EmptyQuote => write!(f, "candidate has no non-empty quote"),
            Self::NotInContext { quote } => {
                write!(f, "quote not found in retrieved context: {quote:?}")
            }
        }
    }
}

/// Normalize text for quote matching: lowercase, punctuation stripped,
/// whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_lowercase().next().unwrap_or(c) } else { ' ' })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `quote` appears verbatim (after normalization) in `context`.
///
/// A quote that normalizes to the empty string is never verbatim.
pub fn is_verbatim(quote: &str, context: &str) -> bool {
    let quote = normalize(quote);
    if quote.is_empty() {
        return false;
    }
    normalize(context).contains(&quote)
}

/// Parse extraction output into candidate JSON objects.
///
/// The generation is instructed to return a bare JSON array, but output is
/// not format-guaranteed: surrounding prose and markdown code fences are
/// tolerated by slicing from the first `[` to the last `]`.
///
/// # Errors
///
/// Returns a description of the structural failure; the caller logs it
/// together with the raw output and contributes zero evidence for the
/// sub-task rather than aborting the run.
pub fn parse_candidates(raw: &str) -> Result<Vec<Value>, String> {
    let start = raw.find('[').ok_or("no JSON array start found")?;
    let end = raw.rfind(']').ok_or("no JSON array end found")?;
    if end < start {
        return Err("mismatched JSON array brackets".into());
    }

    let slice = &raw[start..=end];
    let parsed: Value =
        serde_json::from_str(slice).map_err(|e| format!("invalid JSON: {e}"))?;

    match parsed {
        Value::Array(items) => Ok(items),
        _ => Err("top-level JSON value is not an array".into()),
    }
}

/// Validate one candidate against the schema and the retrieved context.
///
/// `task` is backfilled when the candidate omits it. Returns the accepted
/// item or the reason for rejection.
pub fn validate_candidate(
    candidate: Value,
    task: &str,
    context: &str,
) -> Result<EvidenceItem, Rejection> {
    if !candidate.is_object() {
        return Err(Rejection::NotAnObject);
    }

    let mut item: EvidenceItem =
        serde_json::from_value(candidate).map_err(|_| Rejection::EmptyQuote)?;

    if item.quote.trim().is_empty() {
        return Err(Rejection::EmptyQuote);
    }
    if !is_verbatim(&item.quote, context) {
        return Err(Rejection::NotInContext { quote: item.quote.clone() });
    }
    if item.task.trim().is_empty() {
        item.task = task.to_string();
    }
    if item.song.trim().is_empty() {
        item.song = unknown_song();
    }

    debug!(song = %item.song, theme = %item.theme, "accepted evidence item");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONTEXT: &str = "[SONG=Because | ALBUM=AbbeyRoad | SRC=lyrics/AbbeyRoad/Because.txt]\n\
        Ah\nBecause the world is round\nIt turns me on";

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(normalize("Don’t Let Me Down!"), "don t let me down");
        assert_eq!(normalize("  carry   that\nweight "), "carry that weight");
        assert_eq!(normalize("?!,"), "");
    }

    #[test]
    fn verbatim_check_survives_punctuation_differences() {
        assert!(is_verbatim("because the world is round,", CONTEXT));
        assert!(is_verbatim("IT TURNS ME ON", CONTEXT));
        assert!(!is_verbatim("all you need is love", CONTEXT));
        assert!(!is_verbatim("...", CONTEXT));
    }

    #[test]
    fn parses_bare_array() {
        let items = parse_candidates(r#"[{"quote": "a"}, {"quote": "b"}]"#).expect("parse");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn parses_array_inside_code_fence_and_prose() {
        let raw = "Here is the evidence:\n```json\n[{\"quote\": \"x\"}]\n```\nDone.";
        let items = parse_candidates(raw).expect("parse");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn rejects_output_without_array() {
        assert!(parse_candidates("no evidence found").is_err());
        assert!(parse_candidates("{\"quote\": \"not an array\"}").is_err());
        assert!(parse_candidates("] backwards [").is_err());
    }

    #[test]
    fn accepts_valid_candidate_and_backfills_task() {
        let candidate = json!({
            "song": "Because",
            "quote": "Because the world is round",
            "theme": "cosmic imagery"
        });
        let item = validate_candidate(candidate, "Find lyrics about nature", CONTEXT)
            .expect("accept");
        assert_eq!(item.task, "Find lyrics about nature");
        assert_eq!(item.song, "Because");
    }

    #[test]
    fn rejects_fabricated_quote() {
        let candidate = json!({
            "song": "Because",
            "quote": "the moon is made of cheese",
            "theme": "fabrication"
        });
        let err = validate_candidate(candidate, "task", CONTEXT).expect_err("reject");
        assert!(matches!(err, Rejection::NotInContext { .. }));
    }

    #[test]
    fn rejects_missing_or_empty_quote() {
        let no_quote = json!({"song": "Because", "theme": "t"});
        assert_eq!(validate_candidate(no_quote, "task", CONTEXT), Err(Rejection::EmptyQuote));

        let empty_quote = json!({"quote": "   "});
        assert_eq!(validate_candidate(empty_quote, "task", CONTEXT), Err(Rejection::EmptyQuote));
    }

    #[test]
    fn rejects_non_object_candidates() {
        assert_eq!(
            validate_candidate(json!("just a string"), "task", CONTEXT),
            Err(Rejection::NotAnObject)
        );
    }

    #[test]
    fn unresolvable_song_defaults_to_sentinel() {
        let candidate = json!({"quote": "It turns me on"});
        let item = validate_candidate(candidate, "task", CONTEXT).expect("accept");
        assert_eq!(item.song, UNKNOWN_SONG);
    }
}
