//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Serialized as `{ "value", "createdAt", "ttlMillis" }` inside the durable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Lifetime in milliseconds, measured from `created_at`
    pub ttl_millis: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_millis` - TTL in milliseconds
    pub fn new(value: V, ttl_millis: u64) -> Self {
        Self::with_timestamp(value, current_timestamp_ms(), ttl_millis)
    }

    /// Creates an entry with an explicit creation timestamp.
    pub fn with_timestamp(value: V, created_at: u64, ttl_millis: u64) -> Self {
        Self {
            value,
            created_at,
            ttl_millis,
        }
    }
}

// == Expiry ==
/// Checks whether `entry` is stale at `now`.
///
/// Boundary condition: an entry is still valid when exactly `ttl_millis` have
/// elapsed and expires strictly after that. A `created_at` in the future (clock
/// moved backwards since the snapshot was written) counts as zero elapsed time.
///
/// Every read path (`get`, `has`, snapshot reload) goes through this function.
pub fn is_expired<V>(entry: &CacheEntry<V>, now: u64) -> bool {
    now.saturating_sub(entry.created_at) > entry.ttl_millis
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
