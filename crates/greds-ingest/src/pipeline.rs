use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use greds_core::config::ChunkingConfig;
use greds_core::constants::CHUNKING_STRATEGY;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{Chunk, ChunkId, IngestReport, IngestRequest, SummarySet, Work};
use greds_core::traits::{IChunkStore, IEmbeddingProvider, ISummarizer};
use greds_index::IndexRegistry;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chunker::{ChunkDraft, TextChunker};

/// Drives one work from raw text to a committed, indexed version.
///
/// The store commit is the point of visibility: a provider failure before
/// it leaves the previous version fully intact (the work is only marked
/// failed), and the index swap happens after, against the same chunk set
/// the store accepted.
pub struct IngestPipeline {
    store: Arc<dyn IChunkStore>,
    registry: Arc<IndexRegistry>,
    embedder: Arc<dyn IEmbeddingProvider>,
    summarizer: Arc<dyn ISummarizer>,
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn IChunkStore>,
        registry: Arc<IndexRegistry>,
        embedder: Arc<dyn IEmbeddingProvider>,
        summarizer: Arc<dyn ISummarizer>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            store,
            registry,
            embedder,
            summarizer,
            chunker: TextChunker::new(chunking),
        }
    }

    /// Ingest (or re-ingest) one work.
    ///
    /// Re-ingesting an existing slug bumps its version and replaces the
    /// whole chunk set; chunks whose text is unchanged keep their cached
    /// summaries unless `force_regenerate` is set. A concurrent ingestion
    /// of the same slug is rejected with `Conflict`.
    pub fn ingest(&self, request: &IngestRequest) -> LibraryResult<IngestReport> {
        validate(request)?;

        let drafts = self.chunker.chunk(&request.text);
        let guard = self.registry.begin_work(&request.slug)?;

        let work = self.work_for(request)?;
        let next_version = work.version + 1;
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            slug = %request.slug,
            version = next_version,
            chunks = drafts.len(),
            strategy = CHUNKING_STRATEGY,
            correlation_id = %correlation_id,
            "ingesting work"
        );

        let (chunks, reused, generated) =
            match self.build_chunks(&work, next_version, request, &drafts) {
                Ok(built) => built,
                Err(e) => {
                    // Previous committed version stays live; only the status flips.
                    if let Err(mark_err) = self.store.mark_work_failed(&work.id, &correlation_id) {
                        warn!(slug = %request.slug, error = %mark_err, "could not mark work failed");
                    }
                    return Err(e);
                }
            };

        let committed = self
            .store
            .commit_version(&work.id, work.version, &chunks, &correlation_id)?;
        self.registry.commit_work(&guard, &chunks)?;
        debug!(
            slug = %request.slug,
            version = committed.version,
            reused,
            generated,
            "ingest committed"
        );

        Ok(IngestReport {
            work_id: committed.id,
            slug: committed.slug,
            version: committed.version,
            chunk_ids: chunks.into_iter().map(|c| c.id).collect(),
            summaries_reused: reused,
            summaries_generated: generated,
        })
    }

    /// Fetch the work for a slug, registering it on first ingest and
    /// refreshing title/tags on later ones.
    fn work_for(&self, request: &IngestRequest) -> LibraryResult<Work> {
        if let Some(mut existing) = self.store.get_work_by_slug(&request.slug)? {
            if existing.title != request.title || existing.tags != request.tags {
                self.store
                    .update_work_meta(&existing.id, &request.title, &request.tags)?;
                existing.title = request.title.clone();
                existing.tags = request.tags.clone();
            }
            Ok(existing)
        } else {
            let work = Work {
                tags: request.tags.clone(),
                ..Work::new(Uuid::new_v4().to_string(), &request.slug, &request.title)
            };
            self.store.register_work(&work)?;
            Ok(work)
        }
    }

    /// Embed and summarize every draft into a full chunk row.
    fn build_chunks(
        &self,
        work: &Work,
        version: u64,
        request: &IngestRequest,
        drafts: &[ChunkDraft],
    ) -> LibraryResult<(Vec<Chunk>, u32, u32)> {
        let texts: Vec<String> = drafts.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        let dims = self.embedder.dimensions();

        // Summaries carry over from the previous version when the text is
        // unchanged, keyed by content hash.
        let previous = if work.version > 0 {
            self.store.chunks_for_work(&work.id)?
        } else {
            Vec::new()
        };
        let prior_summaries: HashMap<&str, &SummarySet> = previous
            .iter()
            .filter_map(|c| c.summaries.as_ref().map(|s| (c.content_hash.as_str(), s)))
            .collect();

        let mut reused = 0u32;
        let mut generated = 0u32;
        let mut chunks = Vec::with_capacity(drafts.len());
        for (draft, embedding) in drafts.iter().zip(embeddings) {
            if embedding.len() != dims {
                return Err(LibraryError::UpstreamFailure {
                    provider: self.embedder.name().to_string(),
                    reason: format!(
                        "embedding has {} dimensions, expected {dims}",
                        embedding.len()
                    ),
                });
            }

            let content_hash = Chunk::compute_content_hash(&draft.text);
            let summaries = match prior_summaries.get(content_hash.as_str()) {
                Some(set) if !request.force_regenerate && set.covers(&content_hash) => {
                    reused += 1;
                    (*set).clone()
                }
                _ => {
                    generated += 1;
                    self.summarizer.summarize(&draft.text)?
                }
            };

            chunks.push(Chunk {
                id: ChunkId::new(&request.slug, version, draft.ordinal),
                work_id: work.id.clone(),
                text: draft.text.clone(),
                token_count: draft.token_count,
                content_hash,
                embedding,
                summaries: Some(summaries),
                created_at: Utc::now(),
            });
        }
        Ok((chunks, reused, generated))
    }
}

fn validate(request: &IngestRequest) -> LibraryResult<()> {
    if request.slug.trim().is_empty() {
        return Err(LibraryError::invalid_input("slug must not be empty"));
    }
    if request.slug.contains(':') {
        return Err(LibraryError::invalid_input(
            "slug must not contain ':' (reserved by chunk ids)",
        ));
    }
    if request.text.split_whitespace().next().is_none() {
        return Err(LibraryError::invalid_input("work text contains no tokens"));
    }
    Ok(())
}
