//! Error taxonomy for the library.
//!
//! One top-level enum, [`LibraryError`], with a sub-enum for the storage
//! layer. Callers branch on the top-level variant; only
//! [`LibraryError::UpstreamTimeout`] is retryable.

pub mod storage_error;

pub use storage_error::StorageError;

/// Convenience alias used across the workspace.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Top-level error type for every library operation.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict on {resource}: {reason}")]
    Conflict { resource: String, reason: String },

    #[error("corrupt state: {details}")]
    CorruptState { details: String },

    #[error("provider {provider} timed out after {waited_ms} ms")]
    UpstreamTimeout { provider: String, waited_ms: u64 },

    #[error("provider {provider} failed: {reason}")]
    UpstreamFailure { provider: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LibraryError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        LibraryError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LibraryError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        LibraryError::Conflict {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn corrupt(details: impl Into<String>) -> Self {
        LibraryError::CorruptState {
            details: details.into(),
        }
    }

    /// Whether retrying the same call can succeed. Only timeouts qualify;
    /// a provider that answered with garbage will answer with garbage again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LibraryError::UpstreamTimeout { .. })
    }
}
