//! # greds-library
//!
//! The assembled reference library: storage, the index pair, providers,
//! and the retrieval / verification / session / ingestion engines wired
//! together behind one facade. Open it from a [`LibraryConfig`] and drive
//! everything through [`ReferenceLibrary`] methods; the facade records
//! session history and audit events around the engines it delegates to.

pub mod library;
pub mod observability;

pub use library::{ReferenceLibrary, MEMORY_DB_PATH};
pub use observability::init_tracing;

pub use greds_core::config::LibraryConfig;
pub use greds_core::errors::{LibraryError, LibraryResult};
pub use greds_core::models::{
    AuditEvent, AuditEventType, AuditFilter, AuditStatus, Chunk, ChunkId, Claim, HistoryEntry,
    IngestReport, IngestRequest, QueryFilter, QueryRequest, RankedChunk, RehydratedContext,
    Session, SessionState, Snapshot, VerificationRecord, Verdict, Work,
};
