//! v002: Session snapshot table.

use rusqlite::Connection;

use greds_core::errors::LibraryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS session_snapshots (
            id              TEXT PRIMARY KEY,
            session_id      TEXT NOT NULL,
            format_version  INTEGER NOT NULL,
            payload         TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_snapshots_session
            ON session_snapshots(session_id, created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
