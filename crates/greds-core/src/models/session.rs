use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ChunkId;
use super::verification::Verdict;

/// Session lifecycle states.
///
/// `Active -> Checkpointed -> Rehydrated -> Active` forms the normal cycle;
/// `Closed` is terminal. Recording activity on a checkpointed or rehydrated
/// session moves it back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Checkpointed,
    Rehydrated,
    Closed,
}

/// One event in a session's history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A retrieval ran and returned these chunks.
    Query {
        query: String,
        returned: Vec<ChunkId>,
        at: DateTime<Utc>,
    },
    /// The caller accepted a claim with its citations.
    Claim {
        claim_id: String,
        text: String,
        cited: Vec<ChunkId>,
        at: DateTime<Utc>,
    },
    /// A verification completed.
    Verification {
        record_id: String,
        claim_id: String,
        verdict: Verdict,
        support_score: f64,
        at: DateTime<Utc>,
    },
}

impl HistoryEntry {
    /// Chunk ids this entry references.
    pub fn chunk_ids(&self) -> &[ChunkId] {
        match self {
            HistoryEntry::Query { returned, .. } => returned,
            HistoryEntry::Claim { cited, .. } => cited,
            HistoryEntry::Verification { .. } => &[],
        }
    }
}

/// A working conversation: an ordered history of queries, accepted claims,
/// and verifications, plus lifecycle bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// UUID v4 identifier.
    pub id: String,
    /// Current lifecycle state.
    pub state: SessionState,
    /// Ordered event history, oldest first.
    pub history: Vec<HistoryEntry>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last time anything was recorded.
    pub last_activity: DateTime<Utc>,
    /// Most recent snapshot written for this session, if any.
    pub checkpoint: Option<String>,
    /// Snapshot this session was rehydrated from, if any.
    pub rehydrated_from: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            state: SessionState::Active,
            history: Vec::new(),
            created_at: now,
            last_activity: now,
            checkpoint: None,
            rehydrated_from: None,
        }
    }

    /// Append an entry, touch `last_activity`, and return to `Active` if the
    /// session was checkpointed or rehydrated.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.last_activity = Utc::now();
        if matches!(
            self.state,
            SessionState::Checkpointed | SessionState::Rehydrated
        ) {
            self.state = SessionState::Active;
        }
        self.history.push(entry);
    }

    /// Chunk ids referenced anywhere in the history, most-referenced first.
    /// Ties break toward the id that appeared earliest.
    pub fn top_citations(&self, limit: usize) -> Vec<ChunkId> {
        let mut counts: HashMap<&ChunkId, (usize, usize)> = HashMap::new();
        let mut order = 0usize;
        for entry in &self.history {
            for id in entry.chunk_ids() {
                let slot = counts.entry(id).or_insert((0, order));
                slot.0 += 1;
                order += 1;
            }
        }
        let mut ranked: Vec<(&ChunkId, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Time since the last recorded activity.
    pub fn idle_duration(&self) -> chrono::Duration {
        Utc::now() - self.last_activity
    }
}

/// What a rehydrated session starts from: the checkpoint's condensed summary
/// plus short summaries of the most-cited chunks that still exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehydratedContext {
    /// Id of the newly created session.
    pub session_id: String,
    /// Condensed summary stored in the checkpoint.
    pub condensed_summary: String,
    /// Short summaries of the supporting chunks, same order as
    /// `supporting_chunk_ids`.
    pub top_short_summaries: Vec<String>,
    /// Most-cited chunks from the checkpointed history that still resolve.
    pub supporting_chunk_ids: Vec<ChunkId>,
}
