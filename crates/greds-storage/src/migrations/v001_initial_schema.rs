//! v001: Core tables — works, chunks, schema_version.

use rusqlite::Connection;

use greds_core::errors::LibraryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS works (
            id           TEXT PRIMARY KEY,
            slug         TEXT NOT NULL UNIQUE,
            title        TEXT NOT NULL,
            version      INTEGER NOT NULL DEFAULT 0,
            status       TEXT NOT NULL DEFAULT 'pending',
            tags         TEXT NOT NULL DEFAULT '[]',
            chunk_count  INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            ingested_at  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_works_status ON works(status);
        CREATE INDEX IF NOT EXISTS idx_works_ingested_at ON works(ingested_at);

        CREATE TABLE IF NOT EXISTS chunks (
            id                   TEXT PRIMARY KEY,
            work_id              TEXT NOT NULL,
            ordinal              INTEGER NOT NULL,
            text                 TEXT NOT NULL,
            token_count          INTEGER NOT NULL,
            content_hash         TEXT NOT NULL,
            embedding            BLOB NOT NULL,
            dimensions           INTEGER NOT NULL,
            summary_short        TEXT,
            summary_medium       TEXT,
            summary_long         TEXT,
            summary_source_hash  TEXT,
            created_at           TEXT NOT NULL,
            FOREIGN KEY (work_id) REFERENCES works(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_work ON chunks(work_id, ordinal);
        CREATE INDEX IF NOT EXISTS idx_chunks_content_hash ON chunks(content_hash);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
