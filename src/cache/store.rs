//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with FIFO tracking, TTL
//! expiration and an optional durable snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::entry::{current_timestamp_ms, is_expired};
use crate::cache::{
    CacheEntry, CacheStats, DurableStore, InsertionOrder, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS,
    MIRROR_KEY,
};
use crate::error::MirrorError;

/// Snapshot layout: `[[key, { value, createdAt, ttlMillis }], ...]`, oldest first.
type Snapshot<V> = Vec<(String, CacheEntry<V>)>;

// == Cache Store ==
/// Bounded, expiring, case-insensitive cache with FIFO eviction.
///
/// No operation ever fails: problems with the durable mirror are logged and
/// the cache keeps working in memory.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage, keyed by normalized key
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order tracker
    order: InsertionOrder,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl: u64,
    /// Durable snapshot slot, absent in headless processes
    mirror: Option<Arc<dyn DurableStore>>,
}

impl<V> Default for CacheStore<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS)
    }
}

impl<V> CacheStore<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates a memory-only CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries (values below 1 are raised to 1)
    /// * `default_ttl` - Default TTL in milliseconds for entries without explicit TTL
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            max_entries: max_entries.max(1),
            default_ttl,
            mirror: None,
        }
    }

    /// Creates a CacheStore backed by `mirror` and warm-starts it from the
    /// last snapshot, dropping entries that expired in the meantime.
    pub fn with_mirror(max_entries: usize, default_ttl: u64, mirror: Arc<dyn DurableStore>) -> Self {
        let mut store = Self::new(max_entries, default_ttl);
        store.mirror = Some(mirror);
        store.load_from_storage();
        store
    }

    // == Set ==
    /// Stores a value under the normalized key.
    ///
    /// If the cache is at capacity, the entry inserted first is evicted before
    /// the write, whether or not `key` is already present. Overwriting a key
    /// keeps its position in the eviction order and resets its timestamp.
    ///
    /// # Arguments
    /// * `key` - The key to store (case-insensitive)
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in milliseconds (uses default_ttl if None)
    pub fn set(&mut self, key: &str, value: V, ttl: Option<u64>) {
        let key = normalize_key(key);

        if self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.order.evict_oldest() {
                self.entries.remove(&evicted_key);
                debug!(key = %evicted_key, "Evicted oldest cache entry");
            }
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.order.insert(&key);

        self.persist();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or expired. Expired entries are
    /// removed on the spot and the snapshot is rewritten.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let key = normalize_key(key);
        let now = current_timestamp_ms();

        let Some(entry) = self.entries.get(&key) else {
            debug!(key = %key, "Cache miss");
            return None;
        };

        if !is_expired(entry, now) {
            debug!(key = %key, "Cache hit");
            return Some(entry.value.clone());
        }

        self.entries.remove(&key);
        self.order.remove(&key);
        debug!(key = %key, "Cache entry expired");
        self.persist();
        None
    }

    // == Has ==
    /// Returns true if `get` would return a value. Shares its lazy expiry.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and rewrites the snapshot as empty.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.persist();
    }

    // == Stats ==
    /// Returns the raw state: size, capacity and keys oldest first.
    ///
    /// Does not purge expired entries.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_entries,
            keys: self.order.iter().cloned().collect(),
        }
    }

    // == Load From Storage ==
    /// Replaces the in-memory state with the mirror's snapshot.
    ///
    /// Expired entries are dropped. An unreadable or corrupt snapshot leaves
    /// the cache empty. An empty slot leaves the current state untouched.
    /// Without a mirror this is a no-op.
    pub fn load_from_storage(&mut self) {
        if self.mirror.is_none() {
            return;
        }

        let loaded = self.mirror_call("load", |mirror| {
            mirror
                .get_item(MIRROR_KEY)?
                .map(|raw| serde_json::from_str::<Snapshot<V>>(&raw))
                .transpose()
                .map_err(MirrorError::from)
        });

        match loaded {
            Some(Some(snapshot)) => self.adopt(snapshot),
            Some(None) => debug!("No cache snapshot to load"),
            None => {
                self.entries.clear();
                self.order.clear();
            }
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Default TTL in milliseconds.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Returns true if snapshots are written to a durable store.
    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    fn adopt(&mut self, snapshot: Snapshot<V>) {
        let now = current_timestamp_ms();
        let total = snapshot.len();

        self.entries.clear();
        self.order.clear();

        for (key, entry) in snapshot {
            if is_expired(&entry, now) {
                continue;
            }
            let key = normalize_key(&key);
            self.order.insert(&key);
            self.entries.insert(key, entry);
        }

        // A snapshot written under a larger capacity keeps only its newest entries
        while self.entries.len() > self.max_entries {
            match self.order.evict_oldest() {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }

        info!(
            loaded = self.entries.len(),
            discarded = total - self.entries.len(),
            "Cache restored from snapshot"
        );
    }

    fn persist(&self) {
        self.mirror_call("persist", |mirror| {
            let snapshot: Vec<(&String, &CacheEntry<V>)> = self
                .order
                .iter()
                .filter_map(|key| self.entries.get(key).map(|entry| (key, entry)))
                .collect();
            let raw = serde_json::to_string(&snapshot)?;
            mirror.set_item(MIRROR_KEY, &raw)
        });
    }

    /// Runs `op` against the mirror, downgrading any failure to `None`.
    ///
    /// Also `None` when no mirror is configured; `op` is not invoked then.
    fn mirror_call<T>(
        &self,
        action: &'static str,
        op: impl FnOnce(&dyn DurableStore) -> Result<T, MirrorError>,
    ) -> Option<T> {
        let mirror = self.mirror.as_deref()?;
        match op(mirror) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(action, error = %e, "Cache mirror unavailable, continuing in memory");
                None
            }
        }
    }
}

/// Canonical form of a lookup key.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}
