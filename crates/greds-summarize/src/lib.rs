//! # greds-summarize
//!
//! Three-level chunk summarization: a one-sentence essence, a few-sentence
//! abstract, and a condensed excerpt, all produced through the generation
//! provider and stamped with the source text's content hash so unchanged
//! chunks never pay for regeneration.

pub mod engine;
pub mod levels;

pub use engine::SummaryEngine;
