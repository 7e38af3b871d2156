//! Lyrics corpus parser.
//!
//! The corpus is a single UTF-8 text file of repeated blocks:
//!
//! ```text
//! lyrics/Abbey_Road/Because.txt
//! ===
//! Because the world is round
//! It turns me on
//! ===
//! ```
//!
//! A path line `<namespace>/<album>/<file>.<ext>` opens a block; the body
//! sits between `===` delimiter lines. The parser is deliberately lenient:
//! malformed blocks are skipped, stray lines outside blocks are ignored,
//! and it never fails on malformed input — indexing something beats strict
//! validation for a single curated corpus file.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::document::Document;

/// Delimiter line opening and closing a lyric body.
const BODY_DELIMITER: &str = "===";

static PATH_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^/\s]+/(?P<album>[^/]+)/(?P<file>[^/.]+)\.[A-Za-z0-9]+$")
        .expect("path-line regex is valid")
});

/// Derive a song title from a file stem: underscores become spaces.
fn song_from_file_stem(stem: &str) -> String {
    stem.replace('_', " ").trim().to_string()
}

/// Parse a lyrics corpus into one [`Document`] per song.
///
/// Never returns an error: blocks with a missing opening delimiter are
/// skipped (scanning resumes after the malformed path line), blocks whose
/// closing delimiter is absent at end-of-input keep whatever body was
/// collected, and documents with an empty trimmed body are dropped.
pub fn parse_corpus(raw: &str) -> Vec<Document> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut docs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        let Some(caps) = PATH_LINE_RE.captures(line) else {
            // Stray content outside any block; tolerated.
            i += 1;
            continue;
        };

        let album = caps["album"].trim().to_string();
        let song = song_from_file_stem(caps["file"].trim());
        let source_path = line.to_string();
        i += 1;

        // Seek the opening delimiter, tolerating blank lines.
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        if i >= lines.len() || lines[i].trim() != BODY_DELIMITER {
            warn!(%source_path, "skipping block: missing opening delimiter");
            continue;
        }
        i += 1;

        // Collect body lines verbatim until the closing delimiter.
        let mut body_lines: Vec<&str> = Vec::new();
        while i < lines.len() && lines[i].trim() != BODY_DELIMITER {
            body_lines.push(lines[i]);
            i += 1;
        }
        if i < lines.len() {
            i += 1; // consume closing delimiter
        } else {
            debug!(%source_path, "closing delimiter absent at end of input");
        }

        let text = body_lines.join("\n").trim().to_string();
        if text.is_empty() {
            warn!(%source_path, "dropping block: empty lyric body");
            continue;
        }

        docs.push(Document { text, song, album, source_path });
    }

    debug!(documents = docs.len(), "parsed corpus");
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
lyrics/AbbeyRoad/Because.txt
===
Ah
Because the world is round
It turns me on
===
lyrics/AbbeyRoad/Carry_That_Weight.txt
===
Boy, you're gonna carry that weight
Carry that weight a long time
===
";

    #[test]
    fn parses_well_formed_blocks() {
        let docs = parse_corpus(WELL_FORMED);
        assert_eq!(docs.len(), 2);

        assert_eq!(docs[0].album, "AbbeyRoad");
        assert_eq!(docs[0].song, "Because");
        assert_eq!(docs[0].source_path, "lyrics/AbbeyRoad/Because.txt");
        assert_eq!(docs[0].text, "Ah\nBecause the world is round\nIt turns me on");

        assert_eq!(docs[1].song, "Carry That Weight");
        assert!(docs[1].text.to_lowercase().contains("carry that weight"));
    }

    #[test]
    fn skips_block_missing_opening_delimiter() {
        let corpus = "\
lyrics/Help/Yesterday.txt
Yesterday, all my troubles seemed so far away
lyrics/Help/Ticket_To_Ride.txt
===
She's got a ticket to ride
===
lyrics/Help/Im_Down.txt
===
I'm down
===
";
        let docs = parse_corpus(corpus);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].song, "Ticket To Ride");
        assert_eq!(docs[1].song, "Im Down");
    }

    #[test]
    fn keeps_body_when_closing_delimiter_is_missing_at_eof() {
        let corpus = "\
lyrics/LetItBe/Let_It_Be.txt
===
When I find myself in times of trouble
Mother Mary comes to me
";
        let docs = parse_corpus(corpus);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("Mother Mary"));
    }

    #[test]
    fn drops_block_with_empty_body() {
        let corpus = "\
lyrics/White/Silence.txt
===

===
lyrics/White/Blackbird.txt
===
Blackbird singing in the dead of night
===
";
        let docs = parse_corpus(corpus);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].song, "Blackbird");
    }

    #[test]
    fn ignores_stray_lines_and_blank_lines() {
        let corpus = "\
# not a path line

lyrics/Revolver/Rain.txt
===
When the rain comes
===
trailing noise
";
        let docs = parse_corpus(corpus);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].song, "Rain");
    }

    #[test]
    fn never_panics_on_garbage() {
        assert!(parse_corpus("").is_empty());
        assert!(parse_corpus("===\n===\n===").is_empty());
        assert!(parse_corpus("a/b/c.txt").is_empty());
    }
}
