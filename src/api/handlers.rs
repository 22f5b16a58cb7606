//! API Handlers
//!
//! HTTP request handlers for each city lookup endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{CacheStats, CityCache, FileStore};
use crate::config::Config;
use crate::error::{AggregateError, FetchError, Result};
use crate::fetch::{CityFetcher, HttpAggregator};
use crate::models::{CityRecord, ClearResponse, HealthResponse, SearchQuery};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-first record fetcher
    pub fetcher: CityFetcher,
}

impl AppState {
    /// Creates a new AppState around the given fetcher.
    pub fn new(fetcher: CityFetcher) -> Self {
        Self { fetcher }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The cache snapshots to `config.cache_dir` when it is set and runs
    /// memory-only otherwise.
    pub fn from_config(config: &Config) -> std::result::Result<Self, AggregateError> {
        let cache = match &config.cache_dir {
            Some(dir) => CityCache::with_mirror(
                config.max_entries,
                config.default_ttl_ms,
                Arc::new(FileStore::new(dir)),
            ),
            None => CityCache::new(config.max_entries, config.default_ttl_ms),
        };

        let aggregator = HttpAggregator::new(config.upstream.clone())?;
        Ok(Self::new(CityFetcher::new(cache, Arc::new(aggregator))))
    }
}

/// Handler for GET /api/search?city=<name>
///
/// Returns the aggregated record, served from cache when fresh.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CityRecord>> {
    let city = query.city_name().map_err(FetchError::InvalidRequest)?;
    let record = state.fetcher.fetch_record(city).await?;

    Ok(Json(record))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.fetcher.cache_stats().await)
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.fetcher.clear_cache().await;
    let stats = state.fetcher.cache_stats().await;

    Json(ClearResponse::new(stats.size))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
