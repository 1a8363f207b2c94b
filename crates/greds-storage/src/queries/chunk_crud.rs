//! Chunk rows: insert, lookup, summary updates, index warm-load reads.
//!
//! Embeddings are stored as little-endian f32 blobs beside a dimensions
//! column, so a scan can reject mismatched rows without decoding them.

use rusqlite::{params, Connection, OptionalExtension, Row};

use greds_core::errors::{LibraryError, LibraryResult, StorageError};
use greds_core::models::{Chunk, ChunkId, SummarySet};

use crate::to_storage_err;

/// Insert a single chunk row. Callers wrap this in their own transaction.
pub fn insert_chunk(conn: &Connection, chunk: &Chunk) -> LibraryResult<()> {
    let blob = f32_vec_to_bytes(&chunk.embedding);
    let (short, medium, long, source_hash) = match &chunk.summaries {
        Some(s) => (
            Some(s.short.as_str()),
            Some(s.medium.as_str()),
            Some(s.long.as_str()),
            Some(s.source_hash.as_str()),
        ),
        None => (None, None, None, None),
    };
    conn.execute(
        "INSERT INTO chunks (
            id, work_id, ordinal, text, token_count, content_hash,
            embedding, dimensions, summary_short, summary_medium,
            summary_long, summary_source_hash, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            chunk.id.to_string(),
            chunk.work_id,
            chunk.id.ordinal,
            chunk.text,
            chunk.token_count,
            chunk.content_hash,
            blob,
            chunk.embedding.len() as i64,
            short,
            medium,
            long,
            source_hash,
            chunk.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_chunk(conn: &Connection, id: &ChunkId) -> LibraryResult<Option<Chunk>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {CHUNK_COLUMNS} FROM chunks WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![id.to_string()], |row| Ok(row_to_chunk(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Fetch many chunks; ids that do not resolve are skipped.
pub fn get_chunks(conn: &Connection, ids: &[ChunkId]) -> LibraryResult<Vec<Chunk>> {
    let mut chunks = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(chunk) = get_chunk(conn, id)? {
            chunks.push(chunk);
        }
    }
    Ok(chunks)
}

/// All chunks of a work, ordered by ordinal.
pub fn chunks_for_work(conn: &Connection, work_id: &str) -> LibraryResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CHUNK_COLUMNS} FROM chunks WHERE work_id = ?1 ORDER BY ordinal"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![work_id], |row| Ok(row_to_chunk(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_chunks(rows)
}

/// Every chunk in the store, ordered by id. Used for index rebuilds.
pub fn all_chunks(conn: &Connection) -> LibraryResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {CHUNK_COLUMNS} FROM chunks ORDER BY id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_chunk(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_chunks(rows)
}

pub fn count_chunks(conn: &Connection) -> LibraryResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Overwrite the cached summary set of one chunk.
pub fn update_summaries(
    conn: &Connection,
    id: &ChunkId,
    summaries: &SummarySet,
) -> LibraryResult<()> {
    let affected = conn
        .execute(
            "UPDATE chunks SET summary_short = ?2, summary_medium = ?3,
                    summary_long = ?4, summary_source_hash = ?5
             WHERE id = ?1",
            params![
                id.to_string(),
                summaries.short,
                summaries.medium,
                summaries.long,
                summaries.source_hash,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if affected == 0 {
        return Err(LibraryError::not_found("chunk", id.to_string()));
    }
    Ok(())
}

const CHUNK_COLUMNS: &str = "id, work_id, text, token_count, content_hash, embedding, \
                             dimensions, summary_short, summary_medium, summary_long, \
                             summary_source_hash, created_at";

fn collect_chunks(
    rows: impl Iterator<Item = Result<LibraryResult<Chunk>, rusqlite::Error>>,
) -> LibraryResult<Vec<Chunk>> {
    let mut chunks = Vec::new();
    for row in rows {
        chunks.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(chunks)
}

fn row_to_chunk(row: &Row<'_>) -> LibraryResult<Chunk> {
    let id_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let id = ChunkId::parse(&id_str).map_err(|e| {
        LibraryError::Storage(StorageError::CorruptionDetected { details: e })
    })?;
    let blob: Vec<u8> = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let dimensions: i64 = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    if blob.len() != dimensions as usize * 4 {
        return Err(LibraryError::Storage(StorageError::CorruptionDetected {
            details: format!(
                "chunk {id_str}: embedding blob is {} bytes, expected {}",
                blob.len(),
                dimensions * 4
            ),
        }));
    }

    let short: Option<String> = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let medium: Option<String> = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let long: Option<String> = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let source_hash: Option<String> = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let summaries = match (short, medium, long, source_hash) {
        (Some(short), Some(medium), Some(long), Some(source_hash)) => Some(SummarySet {
            short,
            medium,
            long,
            source_hash,
        }),
        _ => None,
    };

    let created_at: String = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Chunk {
        id,
        work_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        text: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        token_count: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        content_hash: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        embedding: bytes_to_f32_vec(&blob, dimensions as usize),
        summaries,
        created_at: super::parse_ts(&created_at)?,
    })
}

/// Convert f32 slice to bytes (little-endian).
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}
