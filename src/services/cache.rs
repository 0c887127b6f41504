use crate::models::{ScoredPlace, SearchParams};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

// One live entry; spare capacity for invalidated entries awaiting eviction
const MAX_ENTRIES: u64 = 8;

/// Last-search cache
///
/// Holds the ranked results of the most recent search, keyed by its
/// parameters. Storing results for different parameters invalidates the
/// previous entry; entries also expire after the configured TTL.
#[derive(Clone)]
pub struct SearchCache {
    entries: Cache<SearchParams, Arc<Vec<ScoredPlace>>>,
}

impl SearchCache {
    pub fn new(ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(MAX_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    /// Cached results for `params`, if they are the last search
    pub async fn get(&self, params: &SearchParams) -> Option<Arc<Vec<ScoredPlace>>> {
        let hit = self.entries.get(params).await;
        if hit.is_some() {
            tracing::trace!("Search cache hit: {:?}", params);
        } else {
            tracing::trace!("Search cache miss: {:?}", params);
        }
        hit
    }

    /// Store results as the last search, dropping any other entry
    pub async fn store(&self, params: SearchParams, results: Arc<Vec<ScoredPlace>>) {
        if !self.entries.contains_key(&params) {
            self.entries.invalidate_all();
            self.entries.run_pending_tasks().await;
        }
        self.entries.insert(params, results).await;
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get() {
        let cache = SearchCache::new(60);
        let params = SearchParams::new("Gangnam", "bakery", "bread");

        assert!(cache.get(&params).await.is_none());

        cache.store(params.clone(), Arc::new(vec![])).await;
        assert!(cache.get(&params).await.is_some());
    }

    #[tokio::test]
    async fn test_new_params_invalidate_previous() {
        let cache = SearchCache::new(60);
        let first = SearchParams::new("Gangnam", "bakery", "bread");
        let second = SearchParams::new("Gangnam", "bakery", "baguette");

        cache.store(first.clone(), Arc::new(vec![])).await;
        cache.store(second.clone(), Arc::new(vec![])).await;

        assert!(cache.get(&first).await.is_none());
        assert!(cache.get(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = SearchCache::new(60);
        let params = SearchParams::new("Hongdae", "fruit", "apple");

        cache.store(params.clone(), Arc::new(vec![])).await;
        cache.clear();
        assert!(cache.get(&params).await.is_none());
    }
}
