//! Deadline and retry decorators for provider calls.
//!
//! Every call to the wrapped provider runs on a worker thread with a
//! bounded deadline. A call that exceeds the deadline surfaces as
//! `UpstreamTimeout` and is retried with exponential backoff up to the
//! configured count; any other provider error propagates immediately.
//! A timed-out worker is left to finish in the background; its result
//! is discarded.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use greds_core::config::ProviderConfig;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::traits::{IEmbeddingProvider, IGenerationProvider};

/// Timeout and retry bounds for a provider call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            max_retries: config.max_retries,
            backoff_ms: config.backoff_ms,
        }
    }

    /// Run one attempt under the deadline.
    fn attempt<T, F>(&self, provider: &str, op: F) -> LibraryResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> LibraryResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(op());
        });
        match rx.recv_timeout(Duration::from_millis(self.timeout_ms)) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(LibraryError::UpstreamTimeout {
                provider: provider.to_string(),
                waited_ms: self.timeout_ms,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(LibraryError::UpstreamFailure {
                provider: provider.to_string(),
                reason: "provider worker terminated without a result".to_string(),
            }),
        }
    }

    /// Run `op` with the full deadline-and-retry treatment.
    pub fn run<T, F>(&self, provider: &str, op: F) -> LibraryResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> LibraryResult<T> + Send + Clone + 'static,
    {
        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(self.backoff_ms * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                tracing::debug!(provider, attempt, "retrying provider call");
            }
            match self.attempt(provider, op.clone()) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(provider, attempt, error = %e, "provider call timed out");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| LibraryError::UpstreamFailure {
            provider: provider.to_string(),
            reason: "all retries exhausted".to_string(),
        }))
    }
}

/// [`IEmbeddingProvider`] decorator applying a [`RetryPolicy`] per call.
pub struct RetryingEmbedder<P> {
    inner: Arc<P>,
    policy: RetryPolicy,
}

impl<P: IEmbeddingProvider + 'static> RetryingEmbedder<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(inner),
            policy,
        }
    }
}

impl<P: IEmbeddingProvider + 'static> IEmbeddingProvider for RetryingEmbedder<P> {
    fn embed(&self, text: &str) -> LibraryResult<Vec<f32>> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        self.policy
            .run(self.inner.name(), move || inner.embed(&text))
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// [`IGenerationProvider`] decorator applying a [`RetryPolicy`] per call.
pub struct RetryingGenerator<P> {
    inner: Arc<P>,
    policy: RetryPolicy,
}

impl<P: IGenerationProvider + 'static> RetryingGenerator<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(inner),
            policy,
        }
    }
}

impl<P: IGenerationProvider + 'static> IGenerationProvider for RetryingGenerator<P> {
    fn generate(&self, text: &str, max_chars: usize) -> LibraryResult<String> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        self.policy
            .run(self.inner.name(), move || inner.generate(&text, max_chars))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
