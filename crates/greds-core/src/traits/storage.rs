use std::sync::Arc;

use crate::errors::LibraryResult;
use crate::models::{
    AuditEvent, AuditFilter, Chunk, ChunkId, Snapshot, SummarySet, VerificationRecord, Work,
};

/// Persistence seam for works and chunks.
pub trait IChunkStore: Send + Sync {
    // --- Works ---

    /// Insert a newly registered work. Fails with `Conflict` if the slug
    /// is already taken.
    fn register_work(&self, work: &Work) -> LibraryResult<()>;
    fn get_work(&self, id: &str) -> LibraryResult<Option<Work>>;
    fn get_work_by_slug(&self, slug: &str) -> LibraryResult<Option<Work>>;
    fn list_works(&self) -> LibraryResult<Vec<Work>>;
    /// Update title and tags without touching the chunk set.
    fn update_work_meta(&self, work_id: &str, title: &str, tags: &[String]) -> LibraryResult<()>;
    /// Mark the latest ingestion attempt failed and write the failed-ingest
    /// audit event. The committed chunk set stays untouched.
    fn mark_work_failed(&self, work_id: &str, correlation_id: &str) -> LibraryResult<()>;
    /// Delete a work and its whole chunk set in one transaction, and write
    /// the removal audit event. Fails with `NotFound` for unknown ids.
    fn remove_work(&self, work_id: &str, correlation_id: &str) -> LibraryResult<Work>;

    /// Commit a new version of a work in one transaction: bump the version
    /// from `expected_version`, replace the full chunk set, update counts,
    /// and write the ingest audit event. Fails with `Conflict` when the
    /// stored version is not `expected_version`.
    fn commit_version(
        &self,
        work_id: &str,
        expected_version: u64,
        chunks: &[Chunk],
        correlation_id: &str,
    ) -> LibraryResult<Work>;

    // --- Chunks ---

    fn get_chunk(&self, id: &ChunkId) -> LibraryResult<Option<Chunk>>;
    /// Fetch many chunks; ids that do not resolve are skipped.
    fn get_chunks(&self, ids: &[ChunkId]) -> LibraryResult<Vec<Chunk>>;
    /// All chunks of a work's committed version, ordered by ordinal.
    fn chunks_for_work(&self, work_id: &str) -> LibraryResult<Vec<Chunk>>;
    /// Every chunk in the store. Used to rebuild the in-memory indices.
    fn all_chunks(&self) -> LibraryResult<Vec<Chunk>>;
    fn count_chunks(&self) -> LibraryResult<usize>;

    // --- Summaries ---

    fn update_summaries(&self, id: &ChunkId, summaries: &SummarySet) -> LibraryResult<()>;
}

/// Append-only persistence seam for verification records.
pub trait IVerificationStore: Send + Sync {
    fn append_record(&self, record: &VerificationRecord) -> LibraryResult<()>;
    fn get_record(&self, id: &str) -> LibraryResult<Option<VerificationRecord>>;
    fn records_for_claim(&self, claim_id: &str) -> LibraryResult<Vec<VerificationRecord>>;
    /// Newest first.
    fn list_records(&self, limit: usize) -> LibraryResult<Vec<VerificationRecord>>;
}

/// Persistence seam for session snapshots.
pub trait ISessionStore: Send + Sync {
    fn put_snapshot(&self, snapshot: &Snapshot) -> LibraryResult<()>;
    fn get_snapshot(&self, id: &str) -> LibraryResult<Option<Snapshot>>;
    fn latest_snapshot_for_session(&self, session_id: &str) -> LibraryResult<Option<Snapshot>>;
}

/// Append-only audit trail.
pub trait IAuditLog: Send + Sync {
    fn record(&self, event: &AuditEvent) -> LibraryResult<()>;
    fn query(&self, filter: &AuditFilter) -> LibraryResult<Vec<AuditEvent>>;
}

/// Blanket impl: `Arc<T>` implements `IChunkStore` by delegating to the inner `T`.
/// This allows `Arc<StorageEngine>` to be used transparently wherever `&dyn IChunkStore` is needed.
impl<T: IChunkStore> IChunkStore for Arc<T> {
    fn register_work(&self, work: &Work) -> LibraryResult<()> { (**self).register_work(work) }
    fn get_work(&self, id: &str) -> LibraryResult<Option<Work>> { (**self).get_work(id) }
    fn get_work_by_slug(&self, slug: &str) -> LibraryResult<Option<Work>> { (**self).get_work_by_slug(slug) }
    fn list_works(&self) -> LibraryResult<Vec<Work>> { (**self).list_works() }
    fn update_work_meta(&self, work_id: &str, title: &str, tags: &[String]) -> LibraryResult<()> { (**self).update_work_meta(work_id, title, tags) }
    fn mark_work_failed(&self, work_id: &str, correlation_id: &str) -> LibraryResult<()> { (**self).mark_work_failed(work_id, correlation_id) }
    fn remove_work(&self, work_id: &str, correlation_id: &str) -> LibraryResult<Work> { (**self).remove_work(work_id, correlation_id) }
    fn commit_version(&self, work_id: &str, expected_version: u64, chunks: &[Chunk], correlation_id: &str) -> LibraryResult<Work> { (**self).commit_version(work_id, expected_version, chunks, correlation_id) }
    fn get_chunk(&self, id: &ChunkId) -> LibraryResult<Option<Chunk>> { (**self).get_chunk(id) }
    fn get_chunks(&self, ids: &[ChunkId]) -> LibraryResult<Vec<Chunk>> { (**self).get_chunks(ids) }
    fn chunks_for_work(&self, work_id: &str) -> LibraryResult<Vec<Chunk>> { (**self).chunks_for_work(work_id) }
    fn all_chunks(&self) -> LibraryResult<Vec<Chunk>> { (**self).all_chunks() }
    fn count_chunks(&self) -> LibraryResult<usize> { (**self).count_chunks() }
    fn update_summaries(&self, id: &ChunkId, summaries: &SummarySet) -> LibraryResult<()> { (**self).update_summaries(id, summaries) }
}
