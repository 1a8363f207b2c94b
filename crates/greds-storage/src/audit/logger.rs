//! Log every state transition: ingest, query, verify, checkpoint,
//! rehydrate, session close.

use rusqlite::Connection;

use greds_core::errors::LibraryResult;
use greds_core::models::{AuditEvent, AuditEventType, AuditStatus};

use crate::queries::audit_ops;

/// Append-only audit logger. Wraps the audit_ops query functions
/// with a convenient API.
pub struct AuditLogger;

impl AuditLogger {
    /// Log a successful operation.
    pub fn log(
        conn: &Connection,
        event_type: AuditEventType,
        entity_id: &str,
        correlation_id: &str,
        details: serde_json::Value,
    ) -> LibraryResult<()> {
        Self::log_with_status(
            conn,
            event_type,
            entity_id,
            correlation_id,
            AuditStatus::Ok,
            details,
        )
    }

    /// Log a failed operation.
    pub fn log_failure(
        conn: &Connection,
        event_type: AuditEventType,
        entity_id: &str,
        correlation_id: &str,
        details: serde_json::Value,
    ) -> LibraryResult<()> {
        Self::log_with_status(
            conn,
            event_type,
            entity_id,
            correlation_id,
            AuditStatus::Failed,
            details,
        )
    }

    fn log_with_status(
        conn: &Connection,
        event_type: AuditEventType,
        entity_id: &str,
        correlation_id: &str,
        status: AuditStatus,
        details: serde_json::Value,
    ) -> LibraryResult<()> {
        let event = AuditEvent {
            event_type,
            entity_id: entity_id.to_string(),
            correlation_id: correlation_id.to_string(),
            details,
            status,
            timestamp: chrono::Utc::now(),
        };
        audit_ops::insert_audit_event(conn, &event)
    }
}
