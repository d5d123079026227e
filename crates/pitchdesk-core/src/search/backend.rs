//! Search backend trait definition.

use async_trait::async_trait;

use super::model::RawCandidate;

/// Free-text channel search.
///
/// Backends absorb their own failures (logging them) and return an empty
/// list instead.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs `query`, returning up to roughly `limit` raw candidates.
    async fn search(&self, query: &str, limit: usize) -> Vec<RawCandidate>;
}
