//! VerificationEngine — claim-vs-citation scoring and record append.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{Claim, VerificationRecord, Verdict};
use greds_core::traits::{IChunkStore, IEmbeddingProvider, IVerifier, IVerificationStore};
use greds_index::cosine_similarity;

/// Verifies claims against the chunk store.
///
/// A claim's support score is the maximum cosine similarity between the
/// claim's embedding and the embeddings of its cited chunks; every cited
/// chunk must exist at verification time.
pub struct VerificationEngine {
    chunks: Arc<dyn IChunkStore>,
    records: Arc<dyn IVerificationStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
}

impl VerificationEngine {
    pub fn new(
        chunks: Arc<dyn IChunkStore>,
        records: Arc<dyn IVerificationStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
    ) -> Self {
        Self {
            chunks,
            records,
            embedder,
        }
    }
}

impl IVerifier for VerificationEngine {
    fn verify(&self, claim: &Claim) -> LibraryResult<VerificationRecord> {
        if claim.cited.is_empty() {
            return Err(LibraryError::invalid_input(
                "claim cites no chunks; nothing to verify against",
            ));
        }

        let claim_embedding = self.embedder.embed(&claim.text)?;

        let mut support_score = f64::NEG_INFINITY;
        for id in &claim.cited {
            let chunk = self
                .chunks
                .get_chunk(id)?
                .ok_or_else(|| LibraryError::not_found("chunk", id.to_string()))?;
            if chunk.embedding.len() != claim_embedding.len() {
                return Err(LibraryError::invalid_input(format!(
                    "cited chunk {id} has {} embedding dimensions, claim has {}",
                    chunk.embedding.len(),
                    claim_embedding.len()
                )));
            }
            let similarity = cosine_similarity(&claim_embedding, &chunk.embedding);
            if similarity > support_score {
                support_score = similarity;
            }
        }

        let verdict = Verdict::from_score(support_score);
        let record = VerificationRecord {
            id: Uuid::new_v4().to_string(),
            claim_id: claim.id.clone(),
            claim_text: claim.text.clone(),
            cited: claim.cited.clone(),
            support_score,
            verdict,
            checked_at: Utc::now(),
        };
        self.records.append_record(&record)?;

        tracing::debug!(
            claim_id = %claim.id,
            support_score,
            verdict = verdict.as_str(),
            "claim verified"
        );
        Ok(record)
    }
}
