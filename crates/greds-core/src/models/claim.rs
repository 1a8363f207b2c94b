use serde::{Deserialize, Serialize};

use super::ids::ChunkId;

/// A factual statement attributed to specific chunks.
///
/// Verification requires at least one citation; a claim with an empty
/// `cited` list is rejected as invalid input before any scoring runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Caller-supplied identifier, unique within a verification run.
    pub id: String,
    /// The statement being checked.
    pub text: String,
    /// Chunks the statement is attributed to.
    pub cited: Vec<ChunkId>,
}

impl Claim {
    pub fn new(id: impl Into<String>, text: impl Into<String>, cited: Vec<ChunkId>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            cited,
        }
    }
}
