//! Session snapshot rows.

use rusqlite::{params, Connection, OptionalExtension, Row};

use greds_core::errors::LibraryResult;
use greds_core::models::Snapshot;

use crate::to_storage_err;

pub fn insert_snapshot(conn: &Connection, snapshot: &Snapshot) -> LibraryResult<()> {
    conn.execute(
        "INSERT INTO session_snapshots (id, session_id, format_version, payload, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            snapshot.id,
            snapshot.session_id,
            snapshot.format_version,
            snapshot.payload,
            snapshot.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_snapshot(conn: &Connection, id: &str) -> LibraryResult<Option<Snapshot>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, session_id, format_version, payload, created_at
             FROM session_snapshots WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![id], |row| Ok(row_to_snapshot(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

pub fn latest_for_session(
    conn: &Connection,
    session_id: &str,
) -> LibraryResult<Option<Snapshot>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, session_id, format_version, payload, created_at
             FROM session_snapshots WHERE session_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![session_id], |row| Ok(row_to_snapshot(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

fn row_to_snapshot(row: &Row<'_>) -> LibraryResult<Snapshot> {
    let created_at: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Snapshot {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        session_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        format_version: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        payload: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: super::parse_ts(&created_at)?,
    })
}
