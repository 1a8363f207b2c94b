//! # greds-ingest
//!
//! Turns raw work text into committed, indexed chunks:
//! [`TextChunker`] cuts fixed-size token windows with fractional overlap,
//! [`IngestPipeline`] embeds and summarizes them, commits the new version
//! to storage, and swaps it into the index registry.

pub mod chunker;
pub mod pipeline;

pub use chunker::{ChunkDraft, TextChunker};
pub use pipeline::IngestPipeline;
