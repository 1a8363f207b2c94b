//! # greds-verify
//!
//! Citation verification: scores a claim against the chunks it cites by
//! embedding cosine similarity and appends an immutable record of the
//! outcome. The support score is the best similarity across citations,
//! classified pass / partial / fail against fixed thresholds.

pub mod engine;

pub use engine::VerificationEngine;
