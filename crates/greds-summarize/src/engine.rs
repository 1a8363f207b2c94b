//! SummaryEngine — builds all three summary levels for a chunk text.

use std::sync::Arc;

use greds_core::config::SummaryConfig;
use greds_core::errors::LibraryResult;
use greds_core::models::{Chunk, SummaryLevel, SummarySet};
use greds_core::traits::{IGenerationProvider, ISummarizer};

use crate::levels;

/// Generates [`SummarySet`]s through a generation provider, one call per
/// level, and stamps each set with the source text's content hash.
///
/// A provider that overruns a level budget gets its output truncated at a
/// word boundary with a trailing ellipsis, so the stored summary never
/// exceeds the budget.
pub struct SummaryEngine {
    provider: Arc<dyn IGenerationProvider>,
    config: SummaryConfig,
}

impl SummaryEngine {
    pub fn new(provider: Arc<dyn IGenerationProvider>, config: SummaryConfig) -> Self {
        Self { provider, config }
    }

    fn budget(&self, level: SummaryLevel) -> usize {
        match level {
            SummaryLevel::Short => self.config.short_max_chars,
            SummaryLevel::Medium => self.config.medium_max_chars,
            SummaryLevel::Long => self.config.long_max_chars,
        }
    }

    fn generate_level(&self, level: SummaryLevel, text: &str) -> LibraryResult<String> {
        let budget = self.budget(level);
        let generated = levels::generate_at_level(self.provider.as_ref(), level, text, budget)?;
        let produced = generated.chars().count();
        if produced > budget {
            tracing::warn!(
                provider = self.provider.name(),
                level = level.as_str(),
                budget,
                produced,
                "summary overran its budget, truncating"
            );
            return Ok(clamp_to_budget(&generated, budget));
        }
        Ok(generated)
    }
}

/// Cut `text` down to at most `budget` chars, breaking at the last word
/// boundary that fits and ending with an ellipsis.
fn clamp_to_budget(text: &str, budget: usize) -> String {
    let keep: String = text.chars().take(budget.saturating_sub(1)).collect();
    let kept = match keep.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &keep[..pos],
        _ => keep.as_str(),
    };
    format!("{}…", kept.trim_end())
}

impl ISummarizer for SummaryEngine {
    fn summarize(&self, text: &str) -> LibraryResult<SummarySet> {
        Ok(SummarySet {
            short: self.generate_level(SummaryLevel::Short, text)?,
            medium: self.generate_level(SummaryLevel::Medium, text)?,
            long: self.generate_level(SummaryLevel::Long, text)?,
            source_hash: Chunk::compute_content_hash(text),
        })
    }
}
