use serde::{Deserialize, Serialize};

use super::defaults;

/// Session subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How many top-cited chunks a checkpoint records for rehydration.
    pub checkpoint_citation_limit: usize,
    /// Budget for the condensed history summary stored in a checkpoint.
    pub condensed_summary_max_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            checkpoint_citation_limit: defaults::DEFAULT_CHECKPOINT_CITATION_LIMIT,
            condensed_summary_max_chars: defaults::DEFAULT_CONDENSED_SUMMARY_MAX_CHARS,
        }
    }
}
