//! Query functions, one module per table family. All take a borrowed
//! connection so they compose inside transactions.

pub mod audit_ops;
pub mod chunk_crud;
pub mod snapshot_ops;
pub mod verification_ops;
pub mod work_crud;

use chrono::{DateTime, Utc};

use greds_core::errors::{LibraryError, LibraryResult, StorageError};

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_ts(s: &str) -> LibraryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            LibraryError::Storage(StorageError::CorruptionDetected {
                details: format!("bad timestamp {s:?}: {e}"),
            })
        })
}
