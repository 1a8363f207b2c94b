// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "greds.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Chunking ---
pub const DEFAULT_CHUNK_SIZE_TOKENS: usize = 1_024;
pub const DEFAULT_CHUNK_OVERLAP: f64 = 0.2;

// --- Retrieval ---
pub const DEFAULT_QUERY_K: usize = 10;
pub const DEFAULT_MAX_QUERY_K: usize = 100;

// --- Summaries ---
pub const DEFAULT_SHORT_MAX_CHARS: usize = 160;
pub const DEFAULT_MEDIUM_MAX_CHARS: usize = 600;
pub const DEFAULT_LONG_MAX_CHARS: usize = 2_000;

// --- Sessions ---
pub const DEFAULT_CHECKPOINT_CITATION_LIMIT: usize = 10;
pub const DEFAULT_CONDENSED_SUMMARY_MAX_CHARS: usize = 600;

// --- Providers ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_PROVIDER_MAX_RETRIES: u32 = 3;
pub const DEFAULT_PROVIDER_BACKOFF_MS: u64 = 100;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
