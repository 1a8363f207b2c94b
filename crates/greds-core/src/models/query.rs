use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chunk::Chunk;

/// Optional constraints applied after fusion, before truncation to `k`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Keep only chunks whose work carries every one of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Keep only chunks of works ingested at or after this instant.
    #[serde(default)]
    pub ingested_after: Option<DateTime<Utc>>,
    /// Keep only chunks of works ingested at or before this instant.
    #[serde(default)]
    pub ingested_before: Option<DateTime<Utc>>,
}

impl QueryFilter {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.ingested_after.is_none() && self.ingested_before.is_none()
    }
}

/// A hybrid retrieval request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language query text. Must not be empty.
    pub query: String,
    /// Maximum number of results. None = configured default.
    #[serde(default)]
    pub k: Option<usize>,
    /// Post-fusion constraints.
    #[serde(default)]
    pub filter: QueryFilter,
    /// Session to record this query into, if any.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            k: None,
            filter: QueryFilter::default(),
            session_id: None,
        }
    }
}

/// One fused retrieval result.
///
/// Per-channel scores are min-max normalized to [0, 1] over this query's
/// candidate lists; a chunk absent from a channel carries 0.0 there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// 1-based position in the fused ranking.
    pub rank: u32,
    /// Weighted combination of the two normalized scores.
    pub fused_score: f64,
    /// Normalized semantic score.
    pub semantic_score: f64,
    /// Normalized lexical score.
    pub lexical_score: f64,
}
