//! Per-level summary shaping.
//!
//! Each level delegates the condensation itself to the generation provider
//! and owns only the shaping around it: what the provider sees and how the
//! result is laid out.

pub mod long;
pub mod medium;
pub mod short;

use greds_core::errors::LibraryResult;
use greds_core::models::SummaryLevel;
use greds_core::traits::IGenerationProvider;

/// Generate a summary at the given level within its character budget.
pub fn generate_at_level(
    provider: &dyn IGenerationProvider,
    level: SummaryLevel,
    text: &str,
    max_chars: usize,
) -> LibraryResult<String> {
    match level {
        SummaryLevel::Short => short::generate(provider, text, max_chars),
        SummaryLevel::Medium => medium::generate(provider, text, max_chars),
        SummaryLevel::Long => long::generate(provider, text, max_chars),
    }
}

/// Collapse every whitespace run to a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
