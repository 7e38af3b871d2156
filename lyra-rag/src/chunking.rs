//! Document chunking.
//!
//! Splitting is done over characters (not bytes) so that multi-byte
//! punctuation common in lyric transcriptions never lands on a slice
//! boundary.

use crate::document::{Chunk, Document};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 800;
/// Default overlap between neighboring chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and provenance but empty
/// embeddings; embeddings are attached by the index build.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks. Empty text yields an empty `Vec`.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into fixed-size overlapping windows by character count.
///
/// Overlap ensures a concept spanning a window boundary is fully captured
/// in at least one chunk. Each chunk copies the parent document's song,
/// album, and source path, and gets the id `{document_id}#{chunk_index}`.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a chunker with the given window size and overlap, both in
    /// characters. An overlap at or above the window size is clamped so
    /// the window always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_overlap = chunk_overlap.min(chunk_size - 1);
        Self { chunk_size, chunk_overlap }
    }

    /// The configured window size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The configured overlap in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = document.text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let text: String = chars[start..end].iter().collect();

            chunks.push(Chunk {
                id: format!("{}#{chunk_index}", document.source_path),
                text,
                embedding: Vec::new(),
                song: document.song.clone(),
                album: document.album.clone(),
                source_path: document.source_path.clone(),
                document_id: document.source_path.clone(),
            });

            chunk_index += 1;
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            text: text.to_string(),
            song: "Because".into(),
            album: "AbbeyRoad".into(),
            source_path: "lyrics/AbbeyRoad/Because.txt".into(),
        }
    }

    #[test]
    fn short_document_yields_single_chunk() {
        let chunker = FixedSizeChunker::new(100, 20);
        let chunks = chunker.chunk(&doc("love is all you need"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "love is all you need");
        assert_eq!(chunks[0].id, "lyrics/AbbeyRoad/Because.txt#0");
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let chunker = FixedSizeChunker::new(10, 4);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.chunk(&doc(text));

        // Step is 6, so windows start at 0, 6, 12, 18, 24.
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0].text, "abcdefghij");
        assert_eq!(chunks[1].text, "ghijklmnop");
        assert!(chunks[0].text.ends_with(&chunks[1].text[..4]));
    }

    #[test]
    fn chunks_copy_document_metadata() {
        let chunker = FixedSizeChunker::default();
        let chunks = chunker.chunk(&doc("some lyric text"));
        assert_eq!(chunks[0].song, "Because");
        assert_eq!(chunks[0].album, "AbbeyRoad");
        assert_eq!(chunks[0].source_path, "lyrics/AbbeyRoad/Because.txt");
        assert!(chunks[0].embedding.is_empty());
    }

    #[test]
    fn splits_on_character_boundaries_not_bytes() {
        let chunker = FixedSizeChunker::new(4, 1);
        // Curly apostrophes are multi-byte in UTF-8.
        let chunks = chunker.chunk(&doc("don’t let me down"));
        let rejoined: String = chunks.iter().map(|c| c.text.as_str()).collect::<String>();
        assert!(rejoined.contains('’'));
    }

    #[test]
    fn degenerate_overlap_is_clamped() {
        let chunker = FixedSizeChunker::new(5, 50);
        let chunks = chunker.chunk(&doc("abcdefghij"));
        // Overlap clamped to size-1, so the window still advances.
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = FixedSizeChunker::default();
        let mut d = doc("x");
        d.text.clear();
        assert!(chunker.chunk(&d).is_empty());
    }
}
