//! # greds-providers
//!
//! Embedding and generation collaborators plus the decorators the library
//! wraps them in:
//!
//! - [`HashEmbedder`] — deterministic feature-hash embeddings, no external
//!   model required
//! - [`ExtractiveGenerator`] — leading-sentence extraction within a
//!   character budget
//! - [`RetryingEmbedder`] / [`RetryingGenerator`] — bounded deadline per
//!   call, retries with backoff on timeout
//! - [`CachingEmbedder`] — moka-backed embedding cache keyed by blake3
//!   content hash
//!
//! Decorators compose: the library stacks cache over retry over the raw
//! provider, so cache hits never pay the deadline machinery.

pub mod cache;
pub mod extractive_generator;
pub mod hash_embedder;
pub mod retry;

pub use cache::CachingEmbedder;
pub use extractive_generator::ExtractiveGenerator;
pub use hash_embedder::HashEmbedder;
pub use retry::{RetryPolicy, RetryingEmbedder, RetryingGenerator};
