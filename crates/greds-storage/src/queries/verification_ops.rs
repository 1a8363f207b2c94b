//! Append-only verification records. Insert and select, never update.

use rusqlite::{params, Connection, OptionalExtension, Row};

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{ChunkId, VerificationRecord, Verdict};

use crate::to_storage_err;

pub fn insert_record(conn: &Connection, record: &VerificationRecord) -> LibraryResult<()> {
    let cited_json = serde_json::to_string(&record.cited)?;
    conn.execute(
        "INSERT INTO verification_records
            (id, claim_id, claim_text, cited, support_score, verdict, checked_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id,
            record.claim_id,
            record.claim_text,
            cited_json,
            record.support_score,
            record.verdict.as_str(),
            record.checked_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_record(conn: &Connection, id: &str) -> LibraryResult<Option<VerificationRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM verification_records WHERE id = ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![id], |row| Ok(row_to_record(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// All records for one claim, oldest first.
pub fn records_for_claim(
    conn: &Connection,
    claim_id: &str,
) -> LibraryResult<Vec<VerificationRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM verification_records
             WHERE claim_id = ?1 ORDER BY checked_at, rowid"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![claim_id], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_records(rows)
}

/// Most recent records across all claims, newest first.
pub fn list_records(conn: &Connection, limit: usize) -> LibraryResult<Vec<VerificationRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM verification_records
             ORDER BY checked_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_records(rows)
}

const RECORD_COLUMNS: &str = "id, claim_id, claim_text, cited, support_score, verdict, checked_at";

fn collect_records(
    rows: impl Iterator<Item = Result<LibraryResult<VerificationRecord>, rusqlite::Error>>,
) -> LibraryResult<Vec<VerificationRecord>> {
    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

fn row_to_record(row: &Row<'_>) -> LibraryResult<VerificationRecord> {
    let cited_json: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let cited: Vec<ChunkId> = serde_json::from_str(&cited_json)?;
    let verdict_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let checked_at: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(VerificationRecord {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        claim_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        claim_text: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        cited,
        support_score: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        verdict: Verdict::parse(&verdict_str).map_err(|e| LibraryError::corrupt(e))?,
        checked_at: super::parse_ts(&checked_at)?,
    })
}
