//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, FIFO eviction and an
//! optional durable snapshot for warm starts.

mod entry;
mod mirror;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, is_expired, CacheEntry};
pub use mirror::{DurableStore, FileStore, MemoryStore, MIRROR_KEY};
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{normalize_key, CacheStore};

use crate::models::CityRecord;

/// Cache of aggregated city records.
pub type CityCache = CacheStore<CityRecord>;

// == Public Constants ==
/// Default maximum number of cached entries
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default entry lifetime in milliseconds (30 minutes)
pub const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;
