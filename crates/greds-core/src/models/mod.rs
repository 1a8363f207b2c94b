pub mod audit;
pub mod chunk;
pub mod claim;
pub mod ids;
pub mod ingest;
pub mod query;
pub mod session;
pub mod snapshot;
pub mod verification;
pub mod work;

pub use audit::{AuditEvent, AuditEventType, AuditFilter, AuditStatus};
pub use chunk::{Chunk, SummaryLevel, SummarySet};
pub use claim::Claim;
pub use ids::ChunkId;
pub use ingest::{IngestReport, IngestRequest};
pub use query::{QueryFilter, QueryRequest, RankedChunk};
pub use session::{HistoryEntry, RehydratedContext, Session, SessionState};
pub use snapshot::{Snapshot, SnapshotPayload};
pub use verification::{VerificationRecord, Verdict};
pub use work::{Work, WorkStatus};
