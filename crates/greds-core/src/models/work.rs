use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a work in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Registered but not yet (re)ingested.
    Pending,
    /// Latest ingestion committed; chunks and indices reflect this version.
    Ingested,
    /// Latest ingestion attempt failed; the previous version stays visible.
    Failed,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::Ingested => "ingested",
            WorkStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(WorkStatus::Pending),
            "ingested" => Ok(WorkStatus::Ingested),
            "failed" => Ok(WorkStatus::Failed),
            other => Err(format!("unknown work status: {other}")),
        }
    }
}

/// A source document registered in the library.
///
/// A work is re-ingestable: each successful ingestion bumps `version` and
/// replaces the full chunk set atomically. Chunks of older versions are gone
/// from the store; citations against them remain detectable through the
/// version embedded in every [`super::ChunkId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Work {
    /// UUID v4 identifier, assigned at first registration.
    pub id: String,
    /// Unique human-readable key, e.g. `origin-of-species`.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Monotonic version, bumped by every committed ingestion. 0 = never ingested.
    pub version: u64,
    /// Current lifecycle status.
    pub status: WorkStatus,
    /// Free-form tags used by retrieval filters.
    pub tags: Vec<String>,
    /// Number of chunks in the committed version.
    pub chunk_count: u32,
    /// When the work was first registered.
    pub created_at: DateTime<Utc>,
    /// When the committed version was ingested. None until first commit.
    pub ingested_at: Option<DateTime<Utc>>,
}

impl Work {
    /// A freshly registered work: version 0, pending, no chunks.
    pub fn new(id: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
            version: 0,
            status: WorkStatus::Pending,
            tags: Vec::new(),
            chunk_count: 0,
            created_at: Utc::now(),
            ingested_at: None,
        }
    }
}

/// Identity equality: two works are equal if they have the same ID.
impl PartialEq for Work {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
