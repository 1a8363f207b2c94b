use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-level character budgets for generated summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Budget for the one-sentence summary.
    pub short_max_chars: usize,
    /// Budget for the few-sentence summary.
    pub medium_max_chars: usize,
    /// Budget for the paragraph summary.
    pub long_max_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            short_max_chars: defaults::DEFAULT_SHORT_MAX_CHARS,
            medium_max_chars: defaults::DEFAULT_MEDIUM_MAX_CHARS,
            long_max_chars: defaults::DEFAULT_LONG_MAX_CHARS,
        }
    }
}
