//! ReferenceLibrary — owns every subsystem and wires them together.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use greds_core::config::LibraryConfig;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{
    AuditEvent, AuditEventType, AuditFilter, AuditStatus, Chunk, ChunkId, Claim, HistoryEntry,
    IngestReport, IngestRequest, QueryRequest, RankedChunk, RehydratedContext, Session, Snapshot,
    VerificationRecord, Work,
};
use greds_core::traits::{
    IAuditLog, IChunkStore, IEmbeddingProvider, IGenerationProvider, IRetriever, ISessionStore,
    ISummarizer, IVerificationStore, IVerifier,
};
use greds_index::IndexRegistry;
use greds_ingest::IngestPipeline;
use greds_providers::{
    CachingEmbedder, ExtractiveGenerator, HashEmbedder, RetryPolicy, RetryingEmbedder,
    RetryingGenerator,
};
use greds_retrieval::RetrievalEngine;
use greds_session::{cleanup, SessionManager};
use greds_storage::StorageEngine;
use greds_summarize::SummaryEngine;
use greds_verify::VerificationEngine;

/// `db_path` value selecting a non-persistent in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// The whole library behind one handle.
///
/// `open` builds the stack bottom-up: storage, a warm index rebuilt from
/// the persisted chunks, the provider decorators (cache over retry over
/// the deterministic providers), then the four engines. Methods delegate
/// to the engines and add the cross-cutting pieces: session history
/// recording and audit events.
pub struct ReferenceLibrary {
    store: Arc<StorageEngine>,
    registry: Arc<IndexRegistry>,
    retriever: RetrievalEngine,
    verifier: VerificationEngine,
    sessions: SessionManager,
    pipeline: IngestPipeline,
    config: LibraryConfig,
}

impl std::fmt::Debug for ReferenceLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceLibrary").finish_non_exhaustive()
    }
}

impl ReferenceLibrary {
    /// Open the library described by `config`.
    ///
    /// A `storage.db_path` of [`MEMORY_DB_PATH`] opens a fresh in-memory
    /// database; any other value is a file path, created on first open.
    /// Chunks already persisted there become searchable before this
    /// returns.
    pub fn open(config: LibraryConfig) -> LibraryResult<Self> {
        config.validate()?;

        let store = if config.storage.db_path == MEMORY_DB_PATH {
            Arc::new(StorageEngine::open_in_memory()?)
        } else {
            Arc::new(StorageEngine::open_with(
                Path::new(&config.storage.db_path),
                config.storage.read_pool_size,
            )?)
        };

        let dimensions = config.provider.embedding_dimensions;
        let policy = RetryPolicy::from_config(&config.provider);
        let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(CachingEmbedder::new(
            RetryingEmbedder::new(HashEmbedder::new(dimensions), policy),
            config.provider.embedding_cache_size,
        ));
        let generator: Arc<dyn IGenerationProvider> =
            Arc::new(RetryingGenerator::new(ExtractiveGenerator::new(), policy));
        let summarizer: Arc<dyn ISummarizer> = Arc::new(SummaryEngine::new(
            Arc::clone(&generator),
            config.summary.clone(),
        ));

        let chunks = store.all_chunks()?;
        let registry = Arc::new(IndexRegistry::load(dimensions, &chunks)?);

        let retriever = RetrievalEngine::new(
            Arc::clone(&registry),
            Arc::clone(&store) as Arc<dyn IChunkStore>,
            Arc::clone(&embedder),
            config.retrieval.clone(),
        );
        let verifier = VerificationEngine::new(
            Arc::clone(&store) as Arc<dyn IChunkStore>,
            Arc::clone(&store) as Arc<dyn IVerificationStore>,
            Arc::clone(&embedder),
        );
        let sessions = SessionManager::new(
            Arc::clone(&store) as Arc<dyn ISessionStore>,
            Arc::clone(&store) as Arc<dyn IChunkStore>,
            Arc::clone(&generator),
            config.session.clone(),
        );
        let pipeline = IngestPipeline::new(
            Arc::clone(&store) as Arc<dyn IChunkStore>,
            Arc::clone(&registry),
            Arc::clone(&embedder),
            summarizer,
            config.chunking.clone(),
        );

        info!(
            version = greds_core::constants::VERSION,
            db = %config.storage.db_path,
            chunks = chunks.len(),
            dimensions,
            "reference library opened"
        );
        Ok(Self {
            store,
            registry,
            retriever,
            verifier,
            sessions,
            pipeline,
            config,
        })
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    // ── Ingestion ──────────────────────────────────────────────────────

    /// Ingest (or re-ingest) one work. See [`IngestPipeline::ingest`].
    pub fn ingest(&self, request: &IngestRequest) -> LibraryResult<IngestReport> {
        self.pipeline.ingest(request)
    }

    /// Remove a work and all its chunks, by slug.
    ///
    /// The work disappears from both storage and the live index; chunk
    /// ids already recorded in session histories simply stop resolving.
    /// Concurrent ingestion of the same slug is rejected with `Conflict`.
    pub fn remove_work(&self, slug: &str) -> LibraryResult<Work> {
        let work = self
            .store
            .get_work_by_slug(slug)?
            .ok_or_else(|| LibraryError::not_found("work", slug))?;

        let guard = self.registry.begin_work(slug)?;
        let correlation_id = Uuid::new_v4().to_string();
        let removed = self.store.remove_work(&work.id, &correlation_id)?;
        self.registry.evict_work(&guard);

        info!(slug, version = removed.version, "work removed");
        Ok(removed)
    }

    /// All registered works.
    pub fn works(&self) -> LibraryResult<Vec<Work>> {
        self.store.list_works()
    }

    /// Look up one work by slug.
    pub fn work(&self, slug: &str) -> LibraryResult<Option<Work>> {
        self.store.get_work_by_slug(slug)
    }

    /// Resolve a chunk by its retrieval id.
    pub fn chunk(&self, id: &ChunkId) -> LibraryResult<Option<Chunk>> {
        self.store.get_chunk(id)
    }

    // ── Query ──────────────────────────────────────────────────────────

    /// Run a hybrid query.
    ///
    /// When the request names a session, the query and its returned chunk
    /// ids are appended to that session's history first; an unknown
    /// session id fails the call even though retrieval itself succeeded.
    pub fn query(&self, request: &QueryRequest) -> LibraryResult<Vec<RankedChunk>> {
        let results = self.retriever.query(request)?;

        if let Some(session_id) = request.session_id.as_deref() {
            let returned = results.iter().map(|r| r.chunk.id.clone()).collect();
            self.sessions
                .record_query(session_id, request.query.trim(), returned)?;
        }

        let correlation_id = Uuid::new_v4().to_string();
        self.audit(
            AuditEventType::Query,
            request.session_id.as_deref().unwrap_or("anonymous"),
            &correlation_id,
            json!({ "query": request.query.trim(), "results": results.len() }),
        );
        Ok(results)
    }

    // ── Verification ───────────────────────────────────────────────────

    /// Verify a claim against its cited chunks and append the immutable
    /// record. When a session is given, the outcome lands in its history.
    pub fn verify(
        &self,
        claim: &Claim,
        session_id: Option<&str>,
    ) -> LibraryResult<VerificationRecord> {
        let record = self.verifier.verify(claim)?;

        if let Some(session_id) = session_id {
            self.sessions.record_verification(session_id, &record)?;
        }

        let correlation_id = Uuid::new_v4().to_string();
        self.audit(
            AuditEventType::Verify,
            &claim.id,
            &correlation_id,
            json!({
                "record_id": record.id,
                "verdict": record.verdict.as_str(),
                "support_score": record.support_score,
            }),
        );
        Ok(record)
    }

    /// Every verification record ever written for a claim, oldest first.
    pub fn verification_records(&self, claim_id: &str) -> LibraryResult<Vec<VerificationRecord>> {
        self.store.records_for_claim(claim_id)
    }

    // ── Sessions ───────────────────────────────────────────────────────

    /// Start a new active session.
    pub fn create_session(&self) -> Session {
        self.sessions.create_session()
    }

    /// A session's current state, by id.
    pub fn session(&self, session_id: &str) -> LibraryResult<Session> {
        self.sessions.get_session(session_id)
    }

    /// A session's history, oldest entry first.
    pub fn history(&self, session_id: &str) -> LibraryResult<Vec<HistoryEntry>> {
        Ok(self.sessions.get_session(session_id)?.history)
    }

    /// Record an accepted claim in a session's history.
    pub fn record_claim(&self, session_id: &str, claim: &Claim) -> LibraryResult<()> {
        self.sessions.record_claim(session_id, claim)
    }

    /// Checkpoint a session. See [`SessionManager::checkpoint`].
    pub fn checkpoint(&self, session_id: &str) -> LibraryResult<Snapshot> {
        let snapshot = self.sessions.checkpoint(session_id)?;
        let correlation_id = Uuid::new_v4().to_string();
        self.audit(
            AuditEventType::Checkpoint,
            session_id,
            &correlation_id,
            json!({ "snapshot_id": snapshot.id }),
        );
        Ok(snapshot)
    }

    /// The most recent snapshot written for a session, if any. This is
    /// how a caller holding only a session id (say, after a restart)
    /// finds something to [`rehydrate`](Self::rehydrate) from.
    pub fn latest_snapshot(&self, session_id: &str) -> LibraryResult<Snapshot> {
        self.store
            .latest_snapshot_for_session(session_id)?
            .ok_or_else(|| LibraryError::not_found("snapshot", session_id))
    }

    /// Start a fresh session from a checkpoint snapshot. See
    /// [`SessionManager::rehydrate`].
    pub fn rehydrate(&self, snapshot_id: &str) -> LibraryResult<RehydratedContext> {
        let context = self.sessions.rehydrate(snapshot_id)?;
        let correlation_id = Uuid::new_v4().to_string();
        self.audit(
            AuditEventType::Rehydrate,
            snapshot_id,
            &correlation_id,
            json!({
                "new_session_id": context.session_id,
                "supporting_chunks": context.supporting_chunk_ids.len(),
            }),
        );
        Ok(context)
    }

    /// Close a session for good. Checkpoints already written stay
    /// rehydratable.
    pub fn close_session(&self, session_id: &str) -> LibraryResult<Session> {
        let session = self.sessions.close(session_id)?;
        let correlation_id = Uuid::new_v4().to_string();
        self.audit(
            AuditEventType::SessionClose,
            session_id,
            &correlation_id,
            json!({ "history_entries": session.history.len() }),
        );
        Ok(session)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.session_count()
    }

    /// Evict live sessions idle for longer than `idle_timeout`. Returns
    /// how many were closed.
    pub fn cleanup_stale_sessions(&self, idle_timeout: chrono::Duration) -> usize {
        cleanup::cleanup_stale_sessions(&self.sessions, idle_timeout)
    }

    // ── Audit ──────────────────────────────────────────────────────────

    /// Query the audit log, newest first.
    pub fn audit_log(&self, filter: &AuditFilter) -> LibraryResult<Vec<AuditEvent>> {
        self.store.query(filter)
    }

    /// Best-effort audit write: the operation already committed, so a
    /// failed write only logs.
    fn audit(
        &self,
        event_type: AuditEventType,
        entity_id: &str,
        correlation_id: &str,
        details: serde_json::Value,
    ) {
        let event = AuditEvent {
            event_type,
            entity_id: entity_id.to_string(),
            correlation_id: correlation_id.to_string(),
            details,
            status: AuditStatus::Ok,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.store.record(&event) {
            warn!(event = event_type.as_str(), error = %e, "audit write failed");
        }
    }
}
