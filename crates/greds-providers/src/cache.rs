//! In-memory embedding cache keyed by blake3 content hash.

use moka::sync::Cache;
use std::time::Duration;

use greds_core::errors::LibraryResult;
use greds_core::traits::IEmbeddingProvider;

/// [`IEmbeddingProvider`] decorator memoizing embeddings by text content.
///
/// Providers here are deterministic, so a cached vector never goes stale;
/// the idle TTL only reclaims memory from one-off query texts.
pub struct CachingEmbedder<P> {
    inner: P,
    cache: Cache<String, Vec<f32>>,
}

impl<P: IEmbeddingProvider> CachingEmbedder<P> {
    pub fn new(inner: P, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { inner, cache }
    }

    fn cache_key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Number of cached embeddings.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: IEmbeddingProvider> IEmbeddingProvider for CachingEmbedder<P> {
    fn embed(&self, text: &str) -> LibraryResult<Vec<f32>> {
        let key = Self::cache_key(text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let vector = self.inner.embed(text)?;
        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
