//! Library configuration.
//!
//! One struct per subsystem, every field with a default, so an empty TOML
//! file is a valid configuration.

pub mod chunking_config;
pub mod defaults;
pub mod observability_config;
pub mod provider_config;
pub mod retrieval_config;
pub mod session_config;
pub mod storage_config;
pub mod summary_config;

pub use chunking_config::ChunkingConfig;
pub use observability_config::ObservabilityConfig;
pub use provider_config::ProviderConfig;
pub use retrieval_config::RetrievalConfig;
pub use session_config::SessionConfig;
pub use storage_config::StorageConfig;
pub use summary_config::SummaryConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{LibraryError, LibraryResult};

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub storage: StorageConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub summary: SummaryConfig,
    pub session: SessionConfig,
    pub provider: ProviderConfig,
    pub observability: ObservabilityConfig,
}

impl LibraryConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml(s: &str) -> LibraryResult<Self> {
        toml::from_str(s).map_err(|e| LibraryError::InvalidInput {
            reason: format!("config parse error: {e}"),
        })
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &std::path::Path) -> LibraryResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LibraryError::InvalidInput {
            reason: format!("cannot read config {}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Validate cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> LibraryResult<()> {
        if self.chunking.chunk_size_tokens == 0 {
            return Err(LibraryError::invalid_input("chunk_size_tokens must be > 0"));
        }
        if !(0.0..1.0).contains(&self.chunking.overlap_fraction) {
            return Err(LibraryError::invalid_input(
                "overlap_fraction must be in [0, 1)",
            ));
        }
        if self.retrieval.default_k == 0 || self.retrieval.default_k > self.retrieval.max_k {
            return Err(LibraryError::invalid_input(
                "default_k must be in [1, max_k]",
            ));
        }
        if self.provider.embedding_dimensions == 0 {
            return Err(LibraryError::invalid_input(
                "embedding_dimensions must be > 0",
            ));
        }
        if self.storage.read_pool_size == 0 {
            return Err(LibraryError::invalid_input("read_pool_size must be > 0"));
        }
        Ok(())
    }
}
