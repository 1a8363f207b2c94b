use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
///
/// The fusion weights are not configurable; they are part of the scoring
/// contract and live in [`crate::constants`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result count when the request does not specify `k`.
    pub default_k: usize,
    /// Upper bound on requested `k`; larger requests are rejected.
    pub max_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: defaults::DEFAULT_QUERY_K,
            max_k: defaults::DEFAULT_MAX_QUERY_K,
        }
    }
}
