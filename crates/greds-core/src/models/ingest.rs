use serde::{Deserialize, Serialize};

use super::ids::ChunkId;

/// A request to ingest (or re-ingest) one work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Unique human-readable key for the work.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Full text to chunk and index.
    pub text: String,
    /// Tags attached to the work.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Regenerate summaries even for chunks whose text is unchanged.
    #[serde(default)]
    pub force_regenerate: bool,
}

impl IngestRequest {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            text: text.into(),
            tags: Vec::new(),
            force_regenerate: false,
        }
    }
}

/// What one committed ingestion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// UUID of the work.
    pub work_id: String,
    /// Slug of the work.
    pub slug: String,
    /// Version committed by this ingestion.
    pub version: u64,
    /// Ids of the chunks written for this version.
    pub chunk_ids: Vec<ChunkId>,
    /// Chunks whose summaries were reused from the previous version.
    pub summaries_reused: u32,
    /// Chunks whose summaries were freshly generated.
    pub summaries_generated: u32,
}
