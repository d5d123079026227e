//! Ordered chain of search backends.

use std::sync::Arc;

use async_trait::async_trait;

use pitchdesk_core::search::{RawCandidate, SearchBackend};

/// Queries each backend in turn; the first non-empty result wins.
#[derive(Clone, Default)]
pub struct FallbackSearch {
    backends: Vec<Arc<dyn SearchBackend>>,
}

impl FallbackSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait]
impl SearchBackend for FallbackSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<RawCandidate> {
        for (index, backend) in self.backends.iter().enumerate() {
            let results = backend.search(query, limit).await;
            if !results.is_empty() {
                return results;
            }
            tracing::info!(backend = index, "search backend returned nothing, trying next");
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        results: Vec<RawCandidate>,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn new(results: Vec<RawCandidate>) -> Arc<Self> {
            Arc::new(Self {
                results,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn search(&self, _query: &str, _limit: usize) -> Vec<RawCandidate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results.clone()
        }
    }

    #[tokio::test]
    async fn test_first_non_empty_result_wins() {
        let empty = FixedBackend::new(Vec::new());
        let primary = FixedBackend::new(vec![RawCandidate::with_username("jobs_one")]);
        let unused = FixedBackend::new(vec![RawCandidate::with_username("jobs_two")]);

        let chain = FallbackSearch::new()
            .with_backend(empty.clone())
            .with_backend(primary.clone())
            .with_backend(unused.clone());

        let results = chain.search("rust", 5).await;
        assert_eq!(results, vec![RawCandidate::with_username("jobs_one")]);
        assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_chain_returns_nothing() {
        assert!(FallbackSearch::new().search("rust", 5).await.is_empty());
    }
}
