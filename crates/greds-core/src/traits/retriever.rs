use crate::errors::LibraryResult;
use crate::models::{QueryRequest, RankedChunk};

/// Hybrid retrieval over the library.
pub trait IRetriever: Send + Sync {
    /// Run a query and return the fused top-k ranking.
    fn query(&self, request: &QueryRequest) -> LibraryResult<Vec<RankedChunk>>;
}
