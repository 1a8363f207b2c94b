/// Library system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Weight of the normalized semantic score in hybrid fusion.
pub const SEMANTIC_WEIGHT: f64 = 0.7;

/// Weight of the normalized lexical score in hybrid fusion.
pub const LEXICAL_WEIGHT: f64 = 0.3;

/// BM25 term-frequency saturation parameter.
pub const BM25_K1: f64 = 1.2;

/// BM25 document-length normalization parameter.
pub const BM25_B: f64 = 0.75;

/// Minimum support score for a `pass` verdict.
pub const PASS_THRESHOLD: f64 = 0.80;

/// Minimum support score for a `partial` verdict. Below this is `fail`.
pub const PARTIAL_THRESHOLD: f64 = 0.50;

/// Session snapshot payload format understood by this build.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Chunking strategy label recorded when a work is ingested.
pub const CHUNKING_STRATEGY: &str = "fixed_tokens_with_overlap";
