use crate::errors::LibraryResult;
use crate::models::SummarySet;

/// Three-level summary generation.
pub trait ISummarizer: Send + Sync {
    /// Generate the short/medium/long summaries for one chunk text.
    fn summarize(&self, text: &str) -> LibraryResult<SummarySet>;
}
