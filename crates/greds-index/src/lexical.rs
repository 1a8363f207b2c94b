//! BM25 inverted index over chunk text.

use std::collections::HashMap;

use greds_core::constants::{BM25_B, BM25_K1};
use greds_core::models::{Chunk, ChunkId};

use crate::tokenize::tokenize;

/// Per-document bookkeeping needed to undo an insertion.
#[derive(Debug, Clone)]
struct DocEntry {
    distinct_terms: Vec<String>,
    length: u32,
}

/// Term → postings inverted index scored with BM25 (k1 = 1.2, b = 0.75).
///
/// `index` replaces any previous postings for the same chunk id, so
/// re-indexing an updated chunk never double-counts terms.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    /// term → (chunk → term frequency)
    postings: HashMap<String, HashMap<ChunkId, u32>>,
    docs: HashMap<ChunkId, DocEntry>,
    total_len: u64,
}

impl LexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a chunk's postings from its text.
    pub fn index(&mut self, chunk: &Chunk) {
        self.remove(&chunk.id);

        let tokens = tokenize(&chunk.text);
        let mut tf: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *tf.entry(token).or_insert(0) += 1;
        }

        let length: u32 = tf.values().sum();
        let mut distinct_terms = Vec::with_capacity(tf.len());
        for (term, count) in tf {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(chunk.id.clone(), count);
            distinct_terms.push(term);
        }

        self.total_len += u64::from(length);
        self.docs.insert(
            chunk.id.clone(),
            DocEntry {
                distinct_terms,
                length,
            },
        );
    }

    /// Remove a chunk's postings. No-op if the chunk was never indexed.
    pub fn remove(&mut self, id: &ChunkId) {
        let Some(entry) = self.docs.remove(id) else {
            return;
        };
        for term in &entry.distinct_terms {
            if let Some(post) = self.postings.get_mut(term) {
                post.remove(id);
                if post.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        self.total_len -= u64::from(entry.length);
    }

    /// Remove every chunk belonging to the given work slug.
    pub fn remove_work(&mut self, slug: &str) {
        let ids: Vec<ChunkId> = self
            .docs
            .keys()
            .filter(|id| id.slug == slug)
            .cloned()
            .collect();
        for id in ids {
            self.remove(&id);
        }
    }

    /// Top-k chunks by BM25 score, descending, ties broken by chunk id
    /// ascending. Query terms absent from the corpus contribute nothing;
    /// an empty query or empty index yields an empty result.
    pub fn search(&self, query: &str, k: usize) -> Vec<(ChunkId, f64)> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || self.docs.is_empty() || k == 0 {
            return Vec::new();
        }

        let n = self.docs.len() as f64;
        let avg_len = self.total_len as f64 / n;

        let mut scores: HashMap<&ChunkId, f64> = HashMap::new();
        for term in &query_terms {
            let Some(post) = self.postings.get(term) else {
                continue;
            };
            let df = post.len() as f64;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            for (id, tf) in post {
                let tf = f64::from(*tf);
                let doc_len = self
                    .docs
                    .get(id)
                    .map(|d| f64::from(d.length))
                    .unwrap_or(avg_len);
                let denom = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * doc_len / avg_len);
                *scores.entry(id).or_insert(0.0) += idf * tf * (BM25_K1 + 1.0) / denom;
            }
        }

        let mut ranked: Vec<(ChunkId, f64)> = scores
            .into_iter()
            .map(|(id, score)| (id.clone(), score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_chunk(slug: &str, ordinal: u32, text: &str) -> Chunk {
        Chunk {
            id: ChunkId::new(slug, 1, ordinal),
            work_id: format!("work-{slug}"),
            text: text.to_string(),
            token_count: text.split_whitespace().count() as u32,
            content_hash: Chunk::compute_content_hash(text),
            embedding: vec![],
            summaries: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn relevant_chunk_outranks_unrelated() {
        let mut index = LexicalIndex::new();
        index.index(&make_chunk("walden", 0, "the pond freezes solid in deep winter"));
        index.index(&make_chunk("walden", 1, "beans grow in the field all summer"));

        let results = index.search("winter pond ice", 10);
        assert!(!results.is_empty());
        assert_eq!(results[0].0, ChunkId::new("walden", 1, 0));
    }

    #[test]
    fn ties_break_by_chunk_id_ascending() {
        let mut index = LexicalIndex::new();
        index.index(&make_chunk("b-work", 0, "identical text here"));
        index.index(&make_chunk("a-work", 0, "identical text here"));

        let results = index.search("identical text", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.slug, "a-work");
        assert_eq!(results[1].0.slug, "b-work");
        assert_eq!(results[0].1, results[1].1);
    }

    #[test]
    fn reindex_replaces_postings() {
        let mut index = LexicalIndex::new();
        let mut chunk = make_chunk("walden", 0, "winter winter winter");
        index.index(&chunk);
        chunk.text = "summer beans".to_string();
        index.index(&chunk);

        assert!(index.search("winter", 10).is_empty());
        assert_eq!(index.search("beans", 10).len(), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_work_drops_all_versions() {
        let mut index = LexicalIndex::new();
        index.index(&make_chunk("walden", 0, "pond text"));
        index.index(&Chunk {
            id: ChunkId::new("walden", 2, 0),
            ..make_chunk("walden", 0, "newer pond text")
        });
        index.index(&make_chunk("origin", 0, "species text"));

        index.remove_work("walden");
        assert!(index.search("pond", 10).is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_query_and_k_zero_yield_nothing() {
        let mut index = LexicalIndex::new();
        index.index(&make_chunk("walden", 0, "pond"));
        assert!(index.search("", 10).is_empty());
        assert!(index.search("?!", 10).is_empty());
        assert!(index.search("pond", 0).is_empty());
    }

    #[test]
    fn truncates_to_k() {
        let mut index = LexicalIndex::new();
        for i in 0..5 {
            index.index(&make_chunk("walden", i, "pond pond pond"));
        }
        assert_eq!(index.search("pond", 3).len(), 3);
    }

    #[test]
    fn rare_term_scores_above_common_term() {
        let mut index = LexicalIndex::new();
        index.index(&make_chunk("walden", 0, "pond loon"));
        index.index(&make_chunk("walden", 1, "pond field"));
        index.index(&make_chunk("walden", 2, "pond woods"));

        // "loon" appears in one chunk, "pond" in all three; the chunk
        // matching the rare term must outrank the ones matching only
        // the common term.
        let results = index.search("loon pond", 10);
        assert_eq!(results[0].0, ChunkId::new("walden", 1, 0));
        assert!(results[0].1 > results[1].1);
    }
}
