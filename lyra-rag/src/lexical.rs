//! BM25 inverted index over the chunk set.
//!
//! Built in memory from the persisted chunks at load time; the chunk set
//! is immutable once indexed, so there is no removal path.

use std::collections::{HashMap, HashSet};

/// Okapi BM25 parameters.
const K1: f32 = 1.5;
const B: f32 = 0.75;

/// An inverted index scoring chunks by BM25 term overlap.
///
/// Chunks are addressed by their ordinal in the owning index's chunk list.
#[derive(Debug, Default)]
pub(crate) struct LexicalIndex {
    /// term → (chunk ordinal, term frequency)
    postings: HashMap<String, Vec<(usize, u32)>>,
    doc_lengths: Vec<usize>,
    total_length: usize,
}

impl LexicalIndex {
    /// Build the index from chunk texts, in ordinal order.
    pub(crate) fn build<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::default();
        for text in texts {
            index.add(text);
        }
        index
    }

    fn add(&mut self, text: &str) {
        let ordinal = self.doc_lengths.len();
        let mut term_counts: HashMap<String, u32> = HashMap::new();
        for token in tokenize(text) {
            *term_counts.entry(token).or_insert(0) += 1;
        }

        let doc_length: usize = term_counts.values().map(|c| *c as usize).sum();
        for (term, count) in term_counts {
            self.postings.entry(term).or_default().push((ordinal, count));
        }
        self.doc_lengths.push(doc_length);
        self.total_length += doc_length;
    }

    /// Score chunks against the query, returning up to `limit` ordinals
    /// ordered by descending BM25 score. Chunks with no term overlap are
    /// omitted.
    pub(crate) fn search(&self, query: &str, limit: usize) -> Vec<(usize, f32)> {
        let total_docs = self.doc_lengths.len();
        if total_docs == 0 {
            return Vec::new();
        }

        let unique_terms: HashSet<String> = tokenize(query).into_iter().collect();
        if unique_terms.is_empty() {
            return Vec::new();
        }

        let avg_doc_len = self.total_length as f32 / total_docs as f32;
        let mut scores: HashMap<usize, f32> = HashMap::new();

        for term in unique_terms {
            let Some(postings) = self.postings.get(&term) else { continue };

            let df = postings.len() as f32;
            let idf = ((total_docs as f32 - df + 0.5) / (df + 0.5)).ln().max(0.0);

            for &(ordinal, term_freq) in postings {
                let doc_length = self.doc_lengths[ordinal] as f32;
                if doc_length == 0.0 {
                    continue;
                }
                let tf = term_freq as f32;
                let denom = tf + K1 * (1.0 - B + B * (doc_length / avg_doc_len));
                let score = idf * (tf * (K1 + 1.0)) / denom;
                *scores.entry(ordinal).or_insert(0.0) += score;
            }
        }

        let mut results: Vec<(usize, f32)> = scores.into_iter().collect();
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        results
    }
}

/// Lowercase alphanumeric tokens. Lyric vocabulary runs short, so
/// two-letter words are kept.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .map(|token| token.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_terms_outrank_non_matching() {
        let index = LexicalIndex::build([
            "the long and winding road",
            "here comes the sun",
            "good day sunshine, the sun is up",
        ]);

        let results = index.search("sun", 10);
        assert!(!results.is_empty());
        let top: Vec<usize> = results.iter().map(|(o, _)| *o).collect();
        assert!(top.contains(&1) || top.contains(&2));
        assert!(!top.contains(&0));
    }

    #[test]
    fn rarer_terms_score_higher() {
        let index = LexicalIndex::build([
            "love love love all you need is love",
            "love me do",
            "strawberry fields forever",
        ]);

        // "strawberry" appears in one chunk, "love" in two; the unique
        // term should pin its chunk to the top.
        let results = index.search("strawberry love", 10);
        assert_eq!(results[0].0, 2);
    }

    #[test]
    fn empty_query_and_empty_index_yield_nothing() {
        let index = LexicalIndex::build(["something in the way she moves"]);
        assert!(index.search("", 10).is_empty());
        assert!(index.search("?!", 10).is_empty());

        let empty = LexicalIndex::default();
        assert!(empty.search("something", 10).is_empty());
    }

    #[test]
    fn limit_truncates_results() {
        let index =
            LexicalIndex::build(["rain falls", "rain again", "rain here", "rain there"]);
        assert_eq!(index.search("rain", 2).len(), 2);
    }
}
