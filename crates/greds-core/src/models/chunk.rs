use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ChunkId;

/// Summary granularity, coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLevel {
    /// One sentence.
    Short,
    /// A few sentences.
    Medium,
    /// Roughly a paragraph.
    Long,
}

impl SummaryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLevel::Short => "short",
            SummaryLevel::Medium => "medium",
            SummaryLevel::Long => "long",
        }
    }
}

/// The three summaries generated for a chunk, plus the hash of the text
/// they were generated from. When the chunk text changes the hash stops
/// matching and the set is regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySet {
    pub short: String,
    pub medium: String,
    pub long: String,
    /// blake3 hash of the chunk text these summaries were derived from.
    pub source_hash: String,
}

impl SummarySet {
    /// Whether these summaries were derived from the given chunk text.
    pub fn covers(&self, content_hash: &str) -> bool {
        self.source_hash == content_hash
    }
}

/// A contiguous span of a work's text, the unit of retrieval and citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Composite identifier `{slug}:{version}:{ordinal}`.
    pub id: ChunkId,
    /// UUID of the owning work.
    pub work_id: String,
    /// Chunk text.
    pub text: String,
    /// Whitespace-token count of `text`.
    pub token_count: u32,
    /// blake3 hash of `text`, for dedup and summary-cache invalidation.
    pub content_hash: String,
    /// Embedding of `text`. Fixed dimension per library.
    pub embedding: Vec<f32>,
    /// Cached summaries, present once summarization has run.
    pub summaries: Option<SummarySet>,
    /// When this chunk row was written.
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Compute the blake3 content hash of chunk text.
    pub fn compute_content_hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Whether the cached summaries still match the chunk text.
    pub fn summaries_current(&self) -> bool {
        self.summaries
            .as_ref()
            .is_some_and(|s| s.covers(&self.content_hash))
    }
}

/// Identity equality: two chunks are equal if they have the same ID.
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
