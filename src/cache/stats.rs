//! Cache Statistics Module
//!
//! Snapshot of the cache's size, capacity and key order.

use serde::Serialize;

// == Cache Stats ==
/// Raw view of the cache at the time it was taken.
///
/// Expired entries that have not been purged yet are still counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Maximum number of entries the cache holds
    pub max_size: usize,
    /// Normalized keys, oldest first
    pub keys: Vec<String>,
}
