//! # greds-core
//!
//! Foundation crate for the GREDS reference library.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LibraryConfig;
pub use errors::{LibraryError, LibraryResult};
pub use models::{Chunk, ChunkId, Claim, RankedChunk, Session, VerificationRecord, Verdict, Work};
