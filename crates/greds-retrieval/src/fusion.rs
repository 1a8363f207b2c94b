//! Min-max normalization and weighted fusion of the two channel rankings.

use std::collections::HashMap;

use greds_core::constants::{LEXICAL_WEIGHT, SEMANTIC_WEIGHT};
use greds_core::models::ChunkId;

/// One chunk's position in the fused ranking, before resolution and
/// filtering. Channel scores are already normalized; a chunk absent from
/// a channel carries 0.0 there.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub id: ChunkId,
    pub fused: f64,
    pub semantic: f64,
    pub lexical: f64,
}

/// Min-max scale a channel's scores to [0, 1].
///
/// A list whose scores all coincide (including a single-element list)
/// normalizes to 1.0: the channel ranked those chunks first and has no
/// spread to express.
fn normalize(scores: &[(ChunkId, f64)]) -> HashMap<ChunkId, f64> {
    let Some(first) = scores.first() else {
        return HashMap::new();
    };
    let mut min = first.1;
    let mut max = first.1;
    for &(_, score) in scores {
        min = min.min(score);
        max = max.max(score);
    }
    let range = max - min;
    scores
        .iter()
        .map(|(id, score)| {
            let norm = if range > 0.0 { (score - min) / range } else { 1.0 };
            (id.clone(), norm)
        })
        .collect()
}

/// Fuse the two channel rankings into one ordered candidate list.
///
/// Ordering: fused score descending, then semantic score descending, then
/// chunk id ascending.
pub(crate) fn fuse(semantic: &[(ChunkId, f64)], lexical: &[(ChunkId, f64)]) -> Vec<Candidate> {
    let semantic_norm = normalize(semantic);
    let lexical_norm = normalize(lexical);

    let mut ids: Vec<&ChunkId> = semantic_norm.keys().chain(lexical_norm.keys()).collect();
    ids.sort();
    ids.dedup();

    let mut candidates: Vec<Candidate> = ids
        .into_iter()
        .map(|id| {
            let semantic = semantic_norm.get(id).copied().unwrap_or(0.0);
            let lexical = lexical_norm.get(id).copied().unwrap_or(0.0);
            Candidate {
                id: id.clone(),
                fused: SEMANTIC_WEIGHT * semantic + LEXICAL_WEIGHT * lexical,
                semantic,
                lexical,
            }
        })
        .collect();
    sort_candidates(&mut candidates);
    candidates
}

fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.fused
            .partial_cmp(&a.fused)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.semantic
                    .partial_cmp(&a.semantic)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}
