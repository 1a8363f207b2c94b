use crate::errors::LibraryResult;

/// Text generation provider used by the summarizer.
pub trait IGenerationProvider: Send + Sync {
    /// Produce a condensed rendition of `text` within `max_chars`.
    ///
    /// Implementations may return fewer characters but never more.
    fn generate(&self, text: &str, max_chars: usize) -> LibraryResult<String>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
