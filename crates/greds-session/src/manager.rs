//! SessionManager — concurrent per-session access via DashMap, checkpoint
//! and rehydrate against the session store.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use greds_core::config::SessionConfig;
use greds_core::constants::SNAPSHOT_FORMAT_VERSION;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{
    Claim, ChunkId, HistoryEntry, RehydratedContext, Session, SessionState, Snapshot,
    SnapshotPayload, VerificationRecord,
};
use greds_core::traits::{IChunkStore, IGenerationProvider, ISessionStore};

/// Releases the per-session checkpoint slot when dropped.
struct CheckpointGuard<'a> {
    manager: &'a SessionManager,
    session_id: String,
}

impl Drop for CheckpointGuard<'_> {
    fn drop(&mut self) {
        self.manager.in_checkpoint.remove(&self.session_id);
    }
}

/// Thread-safe session manager.
///
/// Live sessions sit in a `DashMap`; closing removes the entry, so every
/// later operation on that id fails with `NotFound`. Checkpoint and
/// rehydrate are serialized per session id and reject concurrent attempts
/// with `Conflict`.
pub struct SessionManager {
    sessions: DashMap<String, Session>,
    in_checkpoint: DashMap<String, ()>,
    snapshots: Arc<dyn ISessionStore>,
    chunks: Arc<dyn IChunkStore>,
    generator: Arc<dyn IGenerationProvider>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(
        snapshots: Arc<dyn ISessionStore>,
        chunks: Arc<dyn IChunkStore>,
        generator: Arc<dyn IGenerationProvider>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            in_checkpoint: DashMap::new(),
            snapshots,
            chunks,
            generator,
            config,
        }
    }

    /// Create a new active session.
    pub fn create_session(&self) -> Session {
        let session = Session::new(Uuid::new_v4().to_string());
        self.sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Get a session by id (cloned snapshot of its current state).
    pub fn get_session(&self, session_id: &str) -> LibraryResult<Session> {
        self.sessions
            .get(session_id)
            .map(|r| r.clone())
            .ok_or_else(|| LibraryError::not_found("session", session_id))
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all live sessions.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }

    /// Record a retrieval in a session's history.
    pub fn record_query(
        &self,
        session_id: &str,
        query: &str,
        returned: Vec<ChunkId>,
    ) -> LibraryResult<()> {
        self.record(
            session_id,
            HistoryEntry::Query {
                query: query.to_string(),
                returned,
                at: Utc::now(),
            },
        )
    }

    /// Record an accepted claim in a session's history.
    pub fn record_claim(&self, session_id: &str, claim: &Claim) -> LibraryResult<()> {
        self.record(
            session_id,
            HistoryEntry::Claim {
                claim_id: claim.id.clone(),
                text: claim.text.clone(),
                cited: claim.cited.clone(),
                at: Utc::now(),
            },
        )
    }

    /// Record a completed verification in a session's history.
    pub fn record_verification(
        &self,
        session_id: &str,
        record: &VerificationRecord,
    ) -> LibraryResult<()> {
        self.record(
            session_id,
            HistoryEntry::Verification {
                record_id: record.id.clone(),
                claim_id: record.claim_id.clone(),
                verdict: record.verdict,
                support_score: record.support_score,
                at: record.checked_at,
            },
        )
    }

    fn record(&self, session_id: &str, entry: HistoryEntry) -> LibraryResult<()> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| LibraryError::not_found("session", session_id))?;
        session.record(entry);
        Ok(())
    }

    /// Persist a checkpoint of the session: its full history, a condensed
    /// summary of that history, and the most-cited chunks.
    ///
    /// Entries recorded while the checkpoint is being written land in the
    /// next checkpoint, not this one.
    pub fn checkpoint(&self, session_id: &str) -> LibraryResult<Snapshot> {
        let _guard = self.claim_slot(session_id)?;

        let mut session = self.get_session(session_id)?;
        let rendered = render_history(&session.history);
        let condensed = self
            .generator
            .generate(&rendered, self.config.condensed_summary_max_chars)?;
        let top_citations = session.top_citations(self.config.checkpoint_citation_limit);

        let snapshot_id = Uuid::new_v4().to_string();
        session.state = SessionState::Checkpointed;
        session.checkpoint = Some(snapshot_id.clone());
        let payload = SnapshotPayload {
            session,
            condensed_summary: condensed,
            top_citations,
        };
        let snapshot = Snapshot {
            id: snapshot_id,
            session_id: session_id.to_string(),
            format_version: SNAPSHOT_FORMAT_VERSION,
            payload: serde_json::to_string(&payload)?,
            created_at: Utc::now(),
        };
        self.snapshots.put_snapshot(&snapshot)?;

        // Flip only the state and checkpoint pointer on the live entry;
        // history recorded meanwhile stays untouched.
        if let Some(mut live) = self.sessions.get_mut(session_id) {
            live.state = SessionState::Checkpointed;
            live.checkpoint = Some(snapshot.id.clone());
        }

        tracing::debug!(session_id, snapshot_id = %snapshot.id, "session checkpointed");
        Ok(snapshot)
    }

    /// Start a fresh session from a checkpoint snapshot.
    ///
    /// The new session carries the checkpointed history and points back at
    /// the snapshot it came from; the returned context holds what a caller
    /// needs to resume (condensed summary, short summaries of the top-cited
    /// chunks that still resolve). The source session does not have to be
    /// live: the snapshot is read from the session store.
    pub fn rehydrate(&self, snapshot_id: &str) -> LibraryResult<RehydratedContext> {
        let snapshot = self
            .snapshots
            .get_snapshot(snapshot_id)?
            .ok_or_else(|| LibraryError::not_found("snapshot", snapshot_id))?;
        let _guard = self.claim_slot(&snapshot.session_id)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(LibraryError::corrupt(format!(
                "snapshot {} has format version {}, this build reads version {}",
                snapshot.id, snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        let payload: SnapshotPayload = serde_json::from_str(&snapshot.payload)
            .map_err(|e| LibraryError::corrupt(format!("snapshot {} payload: {e}", snapshot.id)))?;

        let now = Utc::now();
        let mut session = payload.session;
        session.id = Uuid::new_v4().to_string();
        session.state = SessionState::Rehydrated;
        session.checkpoint = None;
        session.rehydrated_from = Some(snapshot.id.clone());
        session.created_at = now;
        session.last_activity = now;

        let mut supporting_chunk_ids = Vec::new();
        let mut top_short_summaries = Vec::new();
        for id in &payload.top_citations {
            if let Some(chunk) = self.chunks.get_chunk(id)? {
                top_short_summaries
                    .push(chunk.summaries.map(|s| s.short).unwrap_or_default());
                supporting_chunk_ids.push(id.clone());
            }
        }

        let new_id = session.id.clone();
        self.sessions.insert(new_id.clone(), session);

        tracing::debug!(
            from_session = %snapshot.session_id,
            new_session = %new_id,
            snapshot_id = %snapshot.id,
            "session rehydrated"
        );
        Ok(RehydratedContext {
            session_id: new_id,
            condensed_summary: payload.condensed_summary,
            top_short_summaries,
            supporting_chunk_ids,
        })
    }

    /// Close a session. Terminal: the id stops resolving afterwards.
    pub fn close(&self, session_id: &str) -> LibraryResult<Session> {
        let (_, mut session) = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| LibraryError::not_found("session", session_id))?;
        session.state = SessionState::Closed;
        Ok(session)
    }

    fn claim_slot(&self, session_id: &str) -> LibraryResult<CheckpointGuard<'_>> {
        match self.in_checkpoint.entry(session_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(LibraryError::conflict(
                "session",
                format!("checkpoint or rehydrate already in progress for '{session_id}'"),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Ok(CheckpointGuard {
                    manager: self,
                    session_id: session_id.to_string(),
                })
            }
        }
    }
}

/// Render a history as plain text, one terminated sentence per entry, for
/// the condensed checkpoint summary.
fn render_history(history: &[HistoryEntry]) -> String {
    let mut lines = Vec::with_capacity(history.len());
    for entry in history {
        match entry {
            HistoryEntry::Query { query, returned, .. } => {
                lines.push(format!("Searched \"{query}\" ({} results).", returned.len()));
            }
            HistoryEntry::Claim { text, cited, .. } => {
                lines.push(format!("Accepted claim citing {} chunks: {text}.", cited.len()));
            }
            HistoryEntry::Verification {
                claim_id,
                verdict,
                support_score,
                ..
            } => {
                lines.push(format!(
                    "Verified {claim_id}: {} at {support_score:.2}.",
                    verdict.as_str()
                ));
            }
        }
    }
    lines.join("\n")
}
