use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry in the append-only audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened.
    pub event_type: AuditEventType,
    /// Entity the event concerns (work id, session id, record id, ...).
    pub entity_id: String,
    /// Correlates the events of one logical operation.
    pub correlation_id: String,
    /// JSON details about the event.
    pub details: serde_json::Value,
    /// Whether the operation succeeded.
    pub status: AuditStatus,
    /// When the event was written.
    pub timestamp: DateTime<Utc>,
}

/// Operations tracked in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Ingest,
    RemoveWork,
    Query,
    Verify,
    Checkpoint,
    Rehydrate,
    SessionClose,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::Ingest => "ingest",
            AuditEventType::RemoveWork => "remove_work",
            AuditEventType::Query => "query",
            AuditEventType::Verify => "verify",
            AuditEventType::Checkpoint => "checkpoint",
            AuditEventType::Rehydrate => "rehydrate",
            AuditEventType::SessionClose => "session_close",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "ingest" => Ok(AuditEventType::Ingest),
            "remove_work" => Ok(AuditEventType::RemoveWork),
            "query" => Ok(AuditEventType::Query),
            "verify" => Ok(AuditEventType::Verify),
            "checkpoint" => Ok(AuditEventType::Checkpoint),
            "rehydrate" => Ok(AuditEventType::Rehydrate),
            "session_close" => Ok(AuditEventType::SessionClose),
            other => Err(format!("unknown audit event type: {other}")),
        }
    }
}

/// Outcome recorded with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Ok,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "ok" => Ok(AuditStatus::Ok),
            "failed" => Ok(AuditStatus::Failed),
            other => Err(format!("unknown audit status: {other}")),
        }
    }
}

/// Filters for reading the audit log back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Only events at or after this instant.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Only events at or before this instant.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Only events of this type.
    #[serde(default)]
    pub event_type: Option<AuditEventType>,
    /// Maximum number of entries, newest first. None = no cap.
    #[serde(default)]
    pub limit: Option<usize>,
}
