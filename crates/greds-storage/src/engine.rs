//! StorageEngine — owns ConnectionPool, implements the persistence traits,
//! startup migrations, pragma configuration.

use std::path::Path;

use greds_core::errors::LibraryResult;
use greds_core::models::{
    AuditEvent, AuditFilter, Chunk, ChunkId, Snapshot, SummarySet, VerificationRecord, Work,
};
use greds_core::traits::{IAuditLog, IChunkStore, ISessionStore, IVerificationStore};

use crate::migrations;
use crate::pool::{ConnectionPool, ReadPool};
use crate::queries;

/// The main storage engine. Owns the connection pool and provides the
/// chunk store, verification store, session store, and audit log seams.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> LibraryResult<Self> {
        Self::open_with(path, ReadPool::default_size())
    }

    /// Open with an explicit read pool size.
    pub fn open_with(path: &Path, read_pool_size: usize) -> LibraryResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine, gone when dropped.
    /// Routes all reads through the writer since in-memory read pool
    /// connections are isolated databases that can't see writer's changes.
    pub fn open_in_memory() -> LibraryResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the write connection.
    fn initialize(&self) -> LibraryResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer (read pool is isolated).
    fn with_reader<F, T>(&self, f: F) -> LibraryResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> LibraryResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IChunkStore for StorageEngine {
    fn register_work(&self, work: &Work) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::work_crud::insert_work(conn, work))
    }

    fn get_work(&self, id: &str) -> LibraryResult<Option<Work>> {
        self.with_reader(|conn| queries::work_crud::get_work(conn, id))
    }

    fn get_work_by_slug(&self, slug: &str) -> LibraryResult<Option<Work>> {
        self.with_reader(|conn| queries::work_crud::get_work_by_slug(conn, slug))
    }

    fn list_works(&self) -> LibraryResult<Vec<Work>> {
        self.with_reader(queries::work_crud::list_works)
    }

    fn update_work_meta(&self, work_id: &str, title: &str, tags: &[String]) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::work_crud::update_work_meta(conn, work_id, title, tags))
    }

    fn mark_work_failed(&self, work_id: &str, correlation_id: &str) -> LibraryResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::work_crud::mark_work_failed(conn, work_id, correlation_id)
        })
    }

    fn remove_work(&self, work_id: &str, correlation_id: &str) -> LibraryResult<Work> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::work_crud::remove_work(conn, work_id, correlation_id))
    }

    fn commit_version(
        &self,
        work_id: &str,
        expected_version: u64,
        chunks: &[Chunk],
        correlation_id: &str,
    ) -> LibraryResult<Work> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::work_crud::commit_version(conn, work_id, expected_version, chunks, correlation_id)
        })
    }

    fn get_chunk(&self, id: &ChunkId) -> LibraryResult<Option<Chunk>> {
        self.with_reader(|conn| queries::chunk_crud::get_chunk(conn, id))
    }

    fn get_chunks(&self, ids: &[ChunkId]) -> LibraryResult<Vec<Chunk>> {
        self.with_reader(|conn| queries::chunk_crud::get_chunks(conn, ids))
    }

    fn chunks_for_work(&self, work_id: &str) -> LibraryResult<Vec<Chunk>> {
        self.with_reader(|conn| queries::chunk_crud::chunks_for_work(conn, work_id))
    }

    fn all_chunks(&self) -> LibraryResult<Vec<Chunk>> {
        self.with_reader(queries::chunk_crud::all_chunks)
    }

    fn count_chunks(&self) -> LibraryResult<usize> {
        self.with_reader(queries::chunk_crud::count_chunks)
    }

    fn update_summaries(&self, id: &ChunkId, summaries: &SummarySet) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::chunk_crud::update_summaries(conn, id, summaries))
    }
}

impl IVerificationStore for StorageEngine {
    fn append_record(&self, record: &VerificationRecord) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::verification_ops::insert_record(conn, record))
    }

    fn get_record(&self, id: &str) -> LibraryResult<Option<VerificationRecord>> {
        self.with_reader(|conn| queries::verification_ops::get_record(conn, id))
    }

    fn records_for_claim(&self, claim_id: &str) -> LibraryResult<Vec<VerificationRecord>> {
        self.with_reader(|conn| queries::verification_ops::records_for_claim(conn, claim_id))
    }

    fn list_records(&self, limit: usize) -> LibraryResult<Vec<VerificationRecord>> {
        self.with_reader(|conn| queries::verification_ops::list_records(conn, limit))
    }
}

impl ISessionStore for StorageEngine {
    fn put_snapshot(&self, snapshot: &Snapshot) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::snapshot_ops::insert_snapshot(conn, snapshot))
    }

    fn get_snapshot(&self, id: &str) -> LibraryResult<Option<Snapshot>> {
        self.with_reader(|conn| queries::snapshot_ops::get_snapshot(conn, id))
    }

    fn latest_snapshot_for_session(&self, session_id: &str) -> LibraryResult<Option<Snapshot>> {
        self.with_reader(|conn| queries::snapshot_ops::latest_for_session(conn, session_id))
    }
}

impl IAuditLog for StorageEngine {
    fn record(&self, event: &AuditEvent) -> LibraryResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::audit_ops::insert_audit_event(conn, event))
    }

    fn query(&self, filter: &AuditFilter) -> LibraryResult<Vec<AuditEvent>> {
        self.with_reader(|conn| queries::audit_ops::query_audit(conn, filter))
    }
}
