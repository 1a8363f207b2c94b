use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ChunkId;
use crate::constants::{PARTIAL_THRESHOLD, PASS_THRESHOLD};

/// Outcome of verifying one claim against its citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Support score >= 0.80.
    Pass,
    /// Support score in [0.50, 0.80).
    Partial,
    /// Support score below 0.50.
    Fail,
}

impl Verdict {
    /// Classify a support score against the fixed boundaries.
    pub fn from_score(score: f64) -> Self {
        if score >= PASS_THRESHOLD {
            Verdict::Pass
        } else if score >= PARTIAL_THRESHOLD {
            Verdict::Partial
        } else {
            Verdict::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Partial => "partial",
            Verdict::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pass" => Ok(Verdict::Pass),
            "partial" => Ok(Verdict::Partial),
            "fail" => Ok(Verdict::Fail),
            other => Err(format!("unknown verdict: {other}")),
        }
    }
}

/// Immutable record of a single claim verification.
///
/// Records are append-only: re-verifying the same claim produces a new
/// record, never an update of an old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// UUID v4 identifier of this record.
    pub id: String,
    /// Caller-supplied claim identifier.
    pub claim_id: String,
    /// The claim text as it was verified.
    pub claim_text: String,
    /// Citations the claim carried.
    pub cited: Vec<ChunkId>,
    /// Maximum cosine similarity between the claim and any cited chunk.
    pub support_score: f64,
    /// Classification of `support_score`.
    pub verdict: Verdict,
    /// When the verification ran.
    pub checked_at: DateTime<Utc>,
}

/// Identity equality: two records are equal if they have the same ID.
impl PartialEq for VerificationRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
