//! v003: Verification records (append-only) and the audit log.

use rusqlite::Connection;

use greds_core::errors::LibraryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS verification_records (
            id             TEXT PRIMARY KEY,
            claim_id       TEXT NOT NULL,
            claim_text     TEXT NOT NULL,
            cited          TEXT NOT NULL DEFAULT '[]',
            support_score  REAL NOT NULL,
            verdict        TEXT NOT NULL,
            checked_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_verification_claim
            ON verification_records(claim_id, checked_at);
        CREATE INDEX IF NOT EXISTS idx_verification_checked_at
            ON verification_records(checked_at);

        CREATE TABLE IF NOT EXISTS audit_log (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            event_type      TEXT NOT NULL,
            entity_id       TEXT NOT NULL,
            correlation_id  TEXT NOT NULL,
            details         TEXT NOT NULL DEFAULT '{}',
            status          TEXT NOT NULL DEFAULT 'ok',
            timestamp       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_type_time ON audit_log(event_type, timestamp);
        CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_log(entity_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
