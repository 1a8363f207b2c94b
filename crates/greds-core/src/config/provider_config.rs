use serde::{Deserialize, Serialize};

use super::defaults;

/// Configuration for embedding and generation providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Embedding dimension. Every stored embedding must match it.
    pub embedding_dimensions: usize,
    /// Deadline for a single provider call, in milliseconds.
    pub timeout_ms: u64,
    /// Retry attempts after a timed-out call.
    pub max_retries: u32,
    /// Backoff after the first timeout, in milliseconds. Doubles on each
    /// further attempt.
    pub backoff_ms: u64,
    /// Max entries in the embedding cache.
    pub embedding_cache_size: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: defaults::DEFAULT_PROVIDER_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_PROVIDER_MAX_RETRIES,
            backoff_ms: defaults::DEFAULT_PROVIDER_BACKOFF_MS,
            embedding_cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
