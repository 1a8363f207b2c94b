//! Numbered schema migrations, applied in order on open.
//!
//! Each migration is idempotent (`CREATE TABLE IF NOT EXISTS`) and recorded
//! in the `schema_version` table once applied.

pub mod v001_initial_schema;
pub mod v002_session_tables;
pub mod v003_verification_tables;

use rusqlite::Connection;

use greds_core::errors::{LibraryError, LibraryResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> LibraryResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_initial_schema::migrate),
    (2, v002_session_tables::migrate),
    (3, v003_verification_tables::migrate),
];

/// Bring the database up to the current schema version.
pub fn run_migrations(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            LibraryError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [*version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> LibraryResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get::<_, u32>(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
