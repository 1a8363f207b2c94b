//! # greds-index
//!
//! In-memory retrieval indices for the reference library:
//!
//! - [`LexicalIndex`] — BM25 inverted index over chunk text
//! - [`SemanticIndex`] — brute-force cosine similarity over chunk embeddings
//! - [`IndexRegistry`] — snapshot-isolated pairing of both, swapped atomically
//!   on ingestion commit so readers never observe a half-updated work
//!
//! Both indices return `(ChunkId, score)` pairs ordered score-descending with
//! chunk id ascending as the tie-break, so rankings are deterministic.

pub mod lexical;
pub mod registry;
pub mod semantic;
pub mod tokenize;

pub use lexical::LexicalIndex;
pub use registry::{IndexRegistry, IndexSnapshot, WorkGuard};
pub use semantic::{cosine_similarity, SemanticIndex};
pub use tokenize::tokenize;
