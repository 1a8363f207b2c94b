use std::collections::HashMap;
use std::sync::Arc;

use greds_core::config::RetrievalConfig;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{Chunk, ChunkId, QueryFilter, QueryRequest, RankedChunk, Work};
use greds_core::traits::{IChunkStore, IEmbeddingProvider, IRetriever};
use greds_index::IndexRegistry;
use tracing::debug;

use crate::fusion;

/// How many candidates to pull from each channel per requested result.
/// Fusion can promote a chunk that only one channel ranked, so both lists
/// are fetched wider than `k`.
const CANDIDATE_OVERSAMPLE: usize = 4;

/// Hybrid retriever over one index registry snapshot per query.
///
/// A query embeds the text, searches both channels of the current
/// snapshot, fuses the rankings, resolves the survivors to stored chunk
/// rows, applies work-level filters, and truncates to `k`. Index entries
/// that no longer resolve in the store are dropped silently.
pub struct RetrievalEngine {
    registry: Arc<IndexRegistry>,
    store: Arc<dyn IChunkStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        registry: Arc<IndexRegistry>,
        store: Arc<dyn IChunkStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            registry,
            store,
            embedder,
            config,
        }
    }

    fn effective_k(&self, request: &QueryRequest) -> LibraryResult<usize> {
        let k = request.k.unwrap_or(self.config.default_k);
        if k == 0 {
            return Err(LibraryError::invalid_input("k must be at least 1"));
        }
        if k > self.config.max_k {
            return Err(LibraryError::invalid_input(format!(
                "k {k} exceeds the maximum of {}",
                self.config.max_k
            )));
        }
        Ok(k)
    }

    /// Works indexed by id, fetched only when the filter needs them.
    fn works_for_filter(&self, filter: &QueryFilter) -> LibraryResult<Option<HashMap<String, Work>>> {
        if filter.is_empty() {
            return Ok(None);
        }
        let works = self
            .store
            .list_works()?
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect();
        Ok(Some(works))
    }
}

impl IRetriever for RetrievalEngine {
    fn query(&self, request: &QueryRequest) -> LibraryResult<Vec<RankedChunk>> {
        let text = request.query.trim();
        if text.is_empty() {
            return Err(LibraryError::invalid_input("query text must not be empty"));
        }
        let k = self.effective_k(request)?;

        let embedding = self.embedder.embed(text)?;
        let snapshot = self.registry.snapshot();
        let fetch = k.saturating_mul(CANDIDATE_OVERSAMPLE);
        let semantic = snapshot.search_semantic(&embedding, fetch)?;
        let lexical = snapshot.search_lexical(text, fetch);

        let candidates = fusion::fuse(&semantic, &lexical);
        debug!(
            query = %text,
            semantic = semantic.len(),
            lexical = lexical.len(),
            candidates = candidates.len(),
            "fused channel rankings"
        );

        let ids: Vec<ChunkId> = candidates.iter().map(|c| c.id.clone()).collect();
        let rows = self.store.get_chunks(&ids)?;
        let by_id: HashMap<&ChunkId, &Chunk> = rows.iter().map(|c| (&c.id, c)).collect();
        let works = self.works_for_filter(&request.filter)?;

        let mut results = Vec::with_capacity(k);
        for candidate in &candidates {
            let Some(chunk) = by_id.get(&candidate.id) else {
                continue;
            };
            if let Some(works) = &works {
                match works.get(&chunk.work_id) {
                    Some(work) if filter_accepts(&request.filter, work) => {}
                    _ => continue,
                }
            }
            results.push(RankedChunk {
                chunk: (*chunk).clone(),
                rank: results.len() as u32 + 1,
                fused_score: candidate.fused,
                semantic_score: candidate.semantic,
                lexical_score: candidate.lexical,
            });
            if results.len() == k {
                break;
            }
        }
        Ok(results)
    }
}

/// Whether a work passes the request's tag and ingestion-date constraints.
fn filter_accepts(filter: &QueryFilter, work: &Work) -> bool {
    if !filter.tags.iter().all(|tag| work.tags.contains(tag)) {
        return false;
    }
    if filter.ingested_after.is_some() || filter.ingested_before.is_some() {
        let Some(at) = work.ingested_at else {
            // Never-ingested works cannot satisfy a date bound.
            return false;
        };
        if filter.ingested_after.is_some_and(|bound| at < bound) {
            return false;
        }
        if filter.ingested_before.is_some_and(|bound| at > bound) {
            return false;
        }
    }
    true
}
