//! City Fetcher
//!
//! Cache-first entry point: a hit never touches the network, a miss runs the
//! aggregation once and caches the result with the default TTL.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::cache::{CacheStats, CityCache};
use crate::error::{FetchError, Result};
use crate::fetch::CityAggregator;
use crate::models::CityRecord;

/// Fetches city records through the shared cache.
///
/// Concurrent misses for the same name are not coalesced: each one calls the
/// aggregator and the last to finish wins the cache slot.
#[derive(Clone)]
pub struct CityFetcher {
    cache: Arc<RwLock<CityCache>>,
    aggregator: Arc<dyn CityAggregator>,
}

impl CityFetcher {
    /// Creates a fetcher owning `cache`.
    pub fn new(cache: CityCache, aggregator: Arc<dyn CityAggregator>) -> Self {
        Self::with_shared_cache(Arc::new(RwLock::new(cache)), aggregator)
    }

    /// Creates a fetcher over a cache shared with other components.
    pub fn with_shared_cache(
        cache: Arc<RwLock<CityCache>>,
        aggregator: Arc<dyn CityAggregator>,
    ) -> Self {
        Self { cache, aggregator }
    }

    /// Shared handle to the underlying cache.
    pub fn cache(&self) -> &Arc<RwLock<CityCache>> {
        &self.cache
    }

    // == Fetch Record ==
    /// Returns the record for `name`, from cache when fresh.
    ///
    /// Upstream failures come back as
    /// `FetchError::Failed("Failed to fetch city data: <reason>")` and leave
    /// the cache untouched.
    #[instrument(skip(self), fields(city = %name))]
    pub async fn fetch_record(&self, name: &str) -> Result<CityRecord> {
        // Write lock: an expired entry is purged on read
        let cached = self.cache.write().await.get(name);
        if let Some(record) = cached {
            info!("Cache hit");
            return Ok(record);
        }

        let record = self.aggregator.aggregate(name).await.map_err(|e| {
            warn!(error = %e, "City aggregation failed");
            FetchError::from(e)
        })?;

        self.cache.write().await.set(name, record.clone(), None);
        info!("Cached fresh city record");

        Ok(record)
    }

    // == Clear Cache ==
    /// Drops every cached record.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("City cache cleared");
    }

    // == Cache Stats ==
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}
