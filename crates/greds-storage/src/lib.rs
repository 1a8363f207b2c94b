//! # greds-storage
//!
//! SQLite persistence for the reference library: works and chunks with their
//! embeddings and summaries, append-only verification records, session
//! snapshots, and the audit log.
//!
//! One serialized write connection, a small pool of read-only connections,
//! WAL throughout. Numbered migrations bring a database to the current
//! schema on open.

pub mod audit;
pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use greds_core::errors::{LibraryError, StorageError};

/// Wrap a low-level SQLite failure into the library error taxonomy.
pub fn to_storage_err(message: impl Into<String>) -> LibraryError {
    LibraryError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}
