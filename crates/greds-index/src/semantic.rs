//! Brute-force cosine similarity index over chunk embeddings.

use std::collections::HashMap;

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::ChunkId;

/// Cosine similarity between two vectors, computed in f64.
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Embedding index scanned linearly at query time.
///
/// Dimensionality is fixed at construction; every insert and every query
/// vector must match it or the call fails with `InvalidInput`.
#[derive(Debug, Clone)]
pub struct SemanticIndex {
    dimensions: usize,
    vectors: HashMap<ChunkId, Vec<f32>>,
}

impl SemanticIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: HashMap::new(),
        }
    }

    /// Insert or replace a chunk's embedding.
    pub fn index(&mut self, id: ChunkId, embedding: Vec<f32>) -> LibraryResult<()> {
        if embedding.len() != self.dimensions {
            return Err(LibraryError::invalid_input(format!(
                "embedding for {id} has {} dimensions, index expects {}",
                embedding.len(),
                self.dimensions
            )));
        }
        self.vectors.insert(id, embedding);
        Ok(())
    }

    /// Remove every chunk belonging to the given work slug.
    pub fn remove_work(&mut self, slug: &str) {
        self.vectors.retain(|id, _| id.slug != slug);
    }

    /// Top-k chunks by cosine similarity to the query embedding, descending,
    /// ties broken by chunk id ascending. A zero-norm query matches nothing.
    pub fn search(&self, query: &[f32], k: usize) -> LibraryResult<Vec<(ChunkId, f64)>> {
        if query.len() != self.dimensions {
            return Err(LibraryError::invalid_input(format!(
                "query embedding has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        // Zero-norm queries have no direction to compare against.
        let query_norm_sq: f64 = query.iter().map(|x| f64::from(*x) * f64::from(*x)).sum();
        if query_norm_sq == 0.0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(ChunkId, f64)> = self
            .vectors
            .iter()
            .map(|(id, stored)| (id.clone(), cosine_similarity(query, stored)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
