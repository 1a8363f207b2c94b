//! Snapshot-isolated pairing of the lexical and semantic indices.
//!
//! Readers take an `Arc` to the last committed [`IndexSnapshot`] and keep
//! using it for the whole query even while an ingestion commits. Commits
//! build a new snapshot from a clone of the current one and swap it in
//! atomically; a per-work guard keeps two ingestions of the same work from
//! interleaving.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{Chunk, ChunkId};

use crate::lexical::LexicalIndex;
use crate::semantic::SemanticIndex;

/// An immutable view over both indices as of one ingestion commit.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub(crate) lexical: LexicalIndex,
    pub(crate) semantic: SemanticIndex,
}

impl IndexSnapshot {
    fn empty(dimensions: usize) -> Self {
        Self {
            lexical: LexicalIndex::new(),
            semantic: SemanticIndex::new(dimensions),
        }
    }

    /// BM25 search over chunk text. See [`LexicalIndex::search`].
    pub fn search_lexical(&self, query: &str, k: usize) -> Vec<(ChunkId, f64)> {
        self.lexical.search(query, k)
    }

    /// Cosine search over chunk embeddings. See [`SemanticIndex::search`].
    pub fn search_semantic(&self, query: &[f32], k: usize) -> LibraryResult<Vec<(ChunkId, f64)>> {
        self.semantic.search(query, k)
    }

    pub fn dimensions(&self) -> usize {
        self.semantic.dimensions()
    }

    /// Number of chunks visible to semantic search.
    pub fn chunk_count(&self) -> usize {
        self.semantic.len()
    }
}

/// Releases the per-work ingest slot when dropped, so a failed ingestion
/// never wedges the work.
pub struct WorkGuard<'a> {
    registry: &'a IndexRegistry,
    slug: String,
}

impl WorkGuard<'_> {
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Debug for WorkGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkGuard")
            .field("slug", &self.slug)
            .finish_non_exhaustive()
    }
}

impl Drop for WorkGuard<'_> {
    fn drop(&mut self) {
        self.registry.in_flight.remove(&self.slug);
    }
}

/// Owns the current [`IndexSnapshot`] and serializes index mutation per work.
pub struct IndexRegistry {
    current: RwLock<Arc<IndexSnapshot>>,
    /// Serializes snapshot rebuilds across works, so a commit can never
    /// overwrite one that landed while it was rebuilding. Readers only
    /// ever wait for the pointer swap itself.
    rebuild: Mutex<()>,
    in_flight: DashMap<String, ()>,
}

impl IndexRegistry {
    /// An empty registry for the given embedding dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(IndexSnapshot::empty(dimensions))),
            rebuild: Mutex::new(()),
            in_flight: DashMap::new(),
        }
    }

    /// Build the initial snapshot from persisted chunks (warm start).
    ///
    /// Chunks whose embedding dimensionality disagrees with `dimensions`
    /// are skipped with a warning; they become searchable again once their
    /// work is re-ingested under the current provider.
    pub fn load(dimensions: usize, chunks: &[Chunk]) -> LibraryResult<Self> {
        let mut lexical = LexicalIndex::new();
        let mut semantic = SemanticIndex::new(dimensions);
        let mut skipped = 0usize;
        for chunk in chunks {
            if chunk.embedding.len() != dimensions {
                skipped += 1;
                continue;
            }
            lexical.index(chunk);
            semantic.index(chunk.id.clone(), chunk.embedding.clone())?;
        }
        if skipped > 0 {
            tracing::warn!(
                skipped,
                dimensions,
                "skipped chunks with mismatched embedding dimensions during index load"
            );
        }
        Ok(Self {
            current: RwLock::new(Arc::new(IndexSnapshot { lexical, semantic })),
            rebuild: Mutex::new(()),
            in_flight: DashMap::new(),
        })
    }

    /// The last committed snapshot. Cheap; callers hold it for the whole
    /// query without blocking committers.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.current.blocking_read())
    }

    /// Claim the ingest slot for a work. Fails with `Conflict` while another
    /// ingestion of the same work is in flight.
    pub fn begin_work(&self, slug: &str) -> LibraryResult<WorkGuard<'_>> {
        match self.in_flight.entry(slug.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(LibraryError::conflict(
                "work",
                format!("ingestion already in flight for '{slug}'"),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Ok(WorkGuard {
                    registry: self,
                    slug: slug.to_string(),
                })
            }
        }
    }

    /// Replace the guarded work's chunks in a new snapshot and swap it in.
    ///
    /// On error the current snapshot stays committed; readers never see the
    /// failed attempt.
    pub fn commit_work(&self, guard: &WorkGuard<'_>, chunks: &[Chunk]) -> LibraryResult<()> {
        let _rebuild = self.rebuild.blocking_lock();
        let current = self.snapshot();
        let mut lexical = current.lexical.clone();
        let mut semantic = current.semantic.clone();

        lexical.remove_work(&guard.slug);
        semantic.remove_work(&guard.slug);
        for chunk in chunks {
            lexical.index(chunk);
            semantic.index(chunk.id.clone(), chunk.embedding.clone())?;
        }

        let next = Arc::new(IndexSnapshot { lexical, semantic });
        *self.current.blocking_write() = next;
        tracing::debug!(
            slug = %guard.slug,
            chunks = chunks.len(),
            "index snapshot swapped"
        );
        Ok(())
    }

    /// Drop the guarded work's chunks from a new snapshot and swap it in.
    pub fn evict_work(&self, guard: &WorkGuard<'_>) {
        let _rebuild = self.rebuild.blocking_lock();
        let current = self.snapshot();
        let mut lexical = current.lexical.clone();
        let mut semantic = current.semantic.clone();

        lexical.remove_work(&guard.slug);
        semantic.remove_work(&guard.slug);

        *self.current.blocking_write() = Arc::new(IndexSnapshot { lexical, semantic });
        tracing::debug!(slug = %guard.slug, "work evicted from index snapshot");
    }
}
