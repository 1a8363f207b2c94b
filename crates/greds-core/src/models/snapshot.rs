use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ChunkId;
use super::session::Session;

/// A persisted session checkpoint.
///
/// The payload is versioned JSON; rehydration refuses payloads whose
/// `format_version` this build does not understand instead of guessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// UUID v4 identifier of this snapshot.
    pub id: String,
    /// Session this snapshot was taken from.
    pub session_id: String,
    /// Payload format version, see [`crate::constants::SNAPSHOT_FORMAT_VERSION`].
    pub format_version: u32,
    /// Serialized [`SnapshotPayload`].
    pub payload: String,
    /// When the checkpoint was taken.
    pub created_at: DateTime<Utc>,
}

/// The serialized body of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPayload {
    /// Full session state at checkpoint time.
    pub session: Session,
    /// Condensed summary of the session, caller-provided or derived.
    pub condensed_summary: String,
    /// Most-cited chunks at checkpoint time.
    pub top_citations: Vec<ChunkId>,
}
