use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunking parameters for ingestion.
///
/// Tokens are whitespace-delimited words; the overlap fraction is applied
/// to `chunk_size_tokens` to decide how far each window steps forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in tokens.
    pub chunk_size_tokens: usize,
    /// Fraction of the window shared with the previous chunk, in [0, 1).
    pub overlap_fraction: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size_tokens: defaults::DEFAULT_CHUNK_SIZE_TOKENS,
            overlap_fraction: defaults::DEFAULT_CHUNK_OVERLAP,
        }
    }
}
