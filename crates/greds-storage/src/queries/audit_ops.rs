//! Audit log rows: append and filtered reads.

use rusqlite::{params, Connection, Row};

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{AuditEvent, AuditEventType, AuditFilter, AuditStatus};

use crate::to_storage_err;

pub fn insert_audit_event(conn: &Connection, event: &AuditEvent) -> LibraryResult<()> {
    conn.execute(
        "INSERT INTO audit_log (event_type, entity_id, correlation_id, details, status, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.event_type.as_str(),
            event.entity_id,
            event.correlation_id,
            event.details.to_string(),
            event.status.as_str(),
            event.timestamp.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Read audit events, newest first, honoring every filter field.
pub fn query_audit(conn: &Connection, filter: &AuditFilter) -> LibraryResult<Vec<AuditEvent>> {
    let mut sql = String::from(
        "SELECT event_type, entity_id, correlation_id, details, status, timestamp
         FROM audit_log WHERE 1=1",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(from) = filter.from {
        sql.push_str(&format!(" AND timestamp >= ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(from.to_rfc3339()));
    }
    if let Some(to) = filter.to {
        sql.push_str(&format!(" AND timestamp <= ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(to.to_rfc3339()));
    }
    if let Some(event_type) = filter.event_type {
        sql.push_str(&format!(" AND event_type = ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(event_type.as_str().to_string()));
    }
    sql.push_str(" ORDER BY timestamp DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(limit as i64));
    }

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), |row| Ok(row_to_event(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut events = Vec::new();
    for row in rows {
        events.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(events)
}

fn row_to_event(row: &Row<'_>) -> LibraryResult<AuditEvent> {
    let event_type_str: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let details_json: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let status_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let timestamp: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(AuditEvent {
        event_type: AuditEventType::parse(&event_type_str)
            .map_err(|e| LibraryError::corrupt(e))?,
        entity_id: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        correlation_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        details: serde_json::from_str(&details_json)?,
        status: AuditStatus::parse(&status_str).map_err(|e| LibraryError::corrupt(e))?,
        timestamp: super::parse_ts(&timestamp)?,
    })
}
