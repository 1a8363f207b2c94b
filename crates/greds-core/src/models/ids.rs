//! Composite chunk identifiers.
//!
//! Every chunk is addressed as `{slug}:{version}:{ordinal}`, so a citation
//! carries enough information to detect that it points at a superseded
//! version of a work without any lookup table.

use serde::{Deserialize, Serialize};

/// A chunk identifier composed of the owning work's slug, the work version
/// the chunk belongs to, and the chunk's position within that version.
///
/// String format: `{slug}:{version}:{ordinal}`, e.g. `origin-of-species:3:17`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChunkId {
    /// Slug of the owning work.
    pub slug: String,
    /// Work version this chunk was produced under.
    pub version: u64,
    /// Zero-based position of the chunk within the version.
    pub ordinal: u32,
}

impl ChunkId {
    pub fn new(slug: impl Into<String>, version: u64, ordinal: u32) -> Self {
        Self {
            slug: slug.into(),
            version,
            ordinal,
        }
    }

    /// Parse a `{slug}:{version}:{ordinal}` string into a `ChunkId`.
    ///
    /// The slug itself may not contain `:`; version and ordinal must be
    /// non-negative integers.
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(format!("invalid chunk id (want slug:version:ordinal): {s}"));
        }
        let (slug, version, ordinal) = (parts[0], parts[1], parts[2]);
        if slug.is_empty() {
            return Err(format!("chunk id slug cannot be empty: {s}"));
        }
        let version: u64 = version
            .parse()
            .map_err(|_| format!("invalid chunk id version: {s}"))?;
        let ordinal: u32 = ordinal
            .parse()
            .map_err(|_| format!("invalid chunk id ordinal: {s}"))?;
        Ok(Self {
            slug: slug.to_string(),
            version,
            ordinal,
        })
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.slug, self.version, self.ordinal)
    }
}

impl TryFrom<String> for ChunkId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ChunkId> for String {
    fn from(id: ChunkId) -> Self {
        id.to_string()
    }
}
