//! Deterministic feature-hash embedding provider.
//!
//! Produces fixed-dimension vectors by hashing terms into signed buckets
//! and weighting by term frequency. No model files, no network — the same
//! text always embeds to the same vector, which keeps retrieval and
//! verification reproducible across runs.

use std::collections::HashMap;

use greds_core::errors::LibraryResult;
use greds_core::traits::IEmbeddingProvider;

/// Feature-hash embedding provider.
///
/// Each term lands in a bucket chosen by FNV-1a; a second hash bit picks
/// the sign so colliding terms tend to cancel instead of piling up.
/// Output vectors are L2-normalized (or all-zero for termless text).
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// FNV-1a over the term bytes.
    fn hash_term(term: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    /// Split into lowercase terms of at least two characters.
    fn terms(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn feature_vector(&self, text: &str) -> Vec<f32> {
        let terms = Self::terms(text);
        if terms.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for term in &terms {
            *tf.entry(term.clone()).or_default() += 1.0;
        }

        let total = terms.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let h = Self::hash_term(term);
            let bucket = (h as usize) % self.dimensions;
            let sign = if h & (1 << 63) == 0 { 1.0 } else { -1.0 };
            // Longer terms carry more signal than near-stopwords.
            let weight = (count / total) * (1.0 + (term.len() as f32).ln());
            vec[bucket] += sign * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> LibraryResult<Vec<f32>> {
        Ok(self.feature_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> LibraryResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.feature_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "feature-hash"
    }
}
