//! City Cache - cache-first city information lookup
//!
//! Aggregates weather, country and nearby places for a city name behind a
//! TTL cache with FIFO eviction and optional durable snapshots.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore, CityCache};
pub use config::Config;
pub use error::{AggregateError, FetchError};
pub use fetch::{CityAggregator, CityFetcher, HttpAggregator};
pub use models::CityRecord;
