//! # greds-retrieval
//!
//! Hybrid retrieval over the index registry: both channels are searched
//! independently, min-max normalized, and fused as
//! `0.7 * semantic + 0.3 * lexical`. Results resolve to full chunk rows
//! and pass through the request's work-level filters before truncation.

pub mod engine;
mod fusion;

pub use engine::RetrievalEngine;
