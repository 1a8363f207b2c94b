//! Insert, lookup, and version-commit operations for works.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{AuditEventType, Chunk, Work, WorkStatus};

use crate::audit::AuditLogger;
use crate::to_storage_err;

/// Insert a newly registered work. The slug must be free.
pub fn insert_work(conn: &Connection, work: &Work) -> LibraryResult<()> {
    if get_work_by_slug(conn, &work.slug)?.is_some() {
        return Err(LibraryError::conflict(
            format!("work {}", work.slug),
            "slug already registered",
        ));
    }
    let tags_json = serde_json::to_string(&work.tags)?;
    conn.execute(
        "INSERT INTO works (id, slug, title, version, status, tags, chunk_count, created_at, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            work.id,
            work.slug,
            work.title,
            work.version,
            work.status.as_str(),
            tags_json,
            work.chunk_count,
            work.created_at.to_rfc3339(),
            work.ingested_at.map(|t| t.to_rfc3339()),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_work(conn: &Connection, id: &str) -> LibraryResult<Option<Work>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, slug, title, version, status, tags, chunk_count, created_at, ingested_at
             FROM works WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![id], |row| Ok(row_to_work(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

pub fn get_work_by_slug(conn: &Connection, slug: &str) -> LibraryResult<Option<Work>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, slug, title, version, status, tags, chunk_count, created_at, ingested_at
             FROM works WHERE slug = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![slug], |row| Ok(row_to_work(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// All works, ordered by slug.
pub fn list_works(conn: &Connection) -> LibraryResult<Vec<Work>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, slug, title, version, status, tags, chunk_count, created_at, ingested_at
             FROM works ORDER BY slug",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_work(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut works = Vec::new();
    for row in rows {
        works.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(works)
}

pub fn update_work_meta(
    conn: &Connection,
    work_id: &str,
    title: &str,
    tags: &[String],
) -> LibraryResult<()> {
    let tags_json = serde_json::to_string(tags)?;
    let affected = conn
        .execute(
            "UPDATE works SET title = ?2, tags = ?3 WHERE id = ?1",
            params![work_id, title, tags_json],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if affected == 0 {
        return Err(LibraryError::not_found("work", work_id));
    }
    Ok(())
}

/// Flip a work's status to failed and record the failed ingest attempt in
/// the audit log, in one transaction.
pub fn mark_work_failed(
    conn: &Connection,
    work_id: &str,
    correlation_id: &str,
) -> LibraryResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("mark_work_failed begin: {e}")))?;

    match mark_work_failed_inner(&tx, work_id, correlation_id) {
        Ok(()) => tx
            .commit()
            .map_err(|e| to_storage_err(format!("mark_work_failed commit: {e}"))),
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn mark_work_failed_inner(
    conn: &Connection,
    work_id: &str,
    correlation_id: &str,
) -> LibraryResult<()> {
    let work =
        get_work(conn, work_id)?.ok_or_else(|| LibraryError::not_found("work", work_id))?;
    conn.execute(
        "UPDATE works SET status = ?2 WHERE id = ?1",
        params![work_id, WorkStatus::Failed.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    AuditLogger::log_failure(
        conn,
        AuditEventType::Ingest,
        work_id,
        correlation_id,
        serde_json::json!({ "slug": work.slug, "version": work.version }),
    )
}

/// Delete a work and its whole chunk set in one transaction, writing the
/// removal audit event. Returns the removed work.
pub fn remove_work(
    conn: &Connection,
    work_id: &str,
    correlation_id: &str,
) -> LibraryResult<Work> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("remove_work begin: {e}")))?;

    match remove_work_inner(&tx, work_id, correlation_id) {
        Ok(work) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("remove_work commit: {e}")))?;
            Ok(work)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn remove_work_inner(
    conn: &Connection,
    work_id: &str,
    correlation_id: &str,
) -> LibraryResult<Work> {
    let work =
        get_work(conn, work_id)?.ok_or_else(|| LibraryError::not_found("work", work_id))?;

    conn.execute("DELETE FROM chunks WHERE work_id = ?1", params![work_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute("DELETE FROM works WHERE id = ?1", params![work_id])
        .map_err(|e| to_storage_err(e.to_string()))?;

    AuditLogger::log(
        conn,
        AuditEventType::RemoveWork,
        work_id,
        correlation_id,
        serde_json::json!({
            "slug": work.slug,
            "version": work.version,
            "chunk_count": work.chunk_count,
        }),
    )?;

    Ok(work)
}

/// Commit a new version of a work in one transaction: check the expected
/// version, replace the chunk set, update the work row, and write the
/// ingest audit event. Exactly one of two concurrent committers wins; the
/// loser sees `Conflict`.
pub fn commit_version(
    conn: &Connection,
    work_id: &str,
    expected_version: u64,
    chunks: &[Chunk],
    correlation_id: &str,
) -> LibraryResult<Work> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("commit_version begin: {e}")))?;

    match commit_version_inner(&tx, work_id, expected_version, chunks, correlation_id) {
        Ok(work) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("commit_version commit: {e}")))?;
            Ok(work)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn commit_version_inner(
    conn: &Connection,
    work_id: &str,
    expected_version: u64,
    chunks: &[Chunk],
    correlation_id: &str,
) -> LibraryResult<Work> {
    let stored: Option<u64> = conn
        .query_row(
            "SELECT version FROM works WHERE id = ?1",
            params![work_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let stored = stored.ok_or_else(|| LibraryError::not_found("work", work_id))?;
    if stored != expected_version {
        return Err(LibraryError::conflict(
            format!("work {work_id}"),
            format!("expected version {expected_version}, found {stored}"),
        ));
    }

    conn.execute("DELETE FROM chunks WHERE work_id = ?1", params![work_id])
        .map_err(|e| to_storage_err(e.to_string()))?;

    for chunk in chunks {
        super::chunk_crud::insert_chunk(conn, chunk)?;
    }

    let new_version = expected_version + 1;
    let ingested_at = Utc::now();
    conn.execute(
        "UPDATE works SET version = ?2, status = ?3, chunk_count = ?4, ingested_at = ?5
         WHERE id = ?1",
        params![
            work_id,
            new_version,
            WorkStatus::Ingested.as_str(),
            chunks.len() as u32,
            ingested_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let work =
        get_work(conn, work_id)?.ok_or_else(|| LibraryError::not_found("work", work_id))?;

    AuditLogger::log(
        conn,
        AuditEventType::Ingest,
        work_id,
        correlation_id,
        serde_json::json!({
            "slug": work.slug,
            "version": new_version,
            "chunk_count": chunks.len(),
        }),
    )?;

    Ok(work)
}

fn row_to_work(row: &Row<'_>) -> LibraryResult<Work> {
    let status_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let ingested_at: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Work {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        slug: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        title: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        version: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        status: WorkStatus::parse(&status_str).map_err(|e| LibraryError::corrupt(e))?,
        tags: serde_json::from_str(&tags_json)?,
        chunk_count: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: super::parse_ts(&created_at)?,
        ingested_at: ingested_at.as_deref().map(super::parse_ts).transpose()?,
    })
}
