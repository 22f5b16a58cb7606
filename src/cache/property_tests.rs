//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's invariants over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{normalize_key, CacheStore, MemoryStore, DEFAULT_TTL_MS};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 20;

// == Strategies ==
/// Generates mixed-case city-like keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 -]{0,31}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Keys distinct after normalization, in generation order
fn unique_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|k| seen.insert(normalize_key(k)))
        .collect()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Has { key }),
        1 => Just(CacheOp::Clear),
    ]
}

fn apply(store: &mut CacheStore<String>, op: CacheOp) {
    match op {
        CacheOp::Set { key, value } => store.set(&key, value, None),
        CacheOp::Get { key } => {
            store.get(&key);
        }
        CacheOp::Has { key } => {
            store.has(&key);
        }
        CacheOp::Clear => store.clear(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Size never exceeds capacity, and stats agree with the store.
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, DEFAULT_TTL_MS);

        for op in ops {
            apply(&mut store, op);

            let stats = store.stats();
            prop_assert!(
                stats.size <= TEST_MAX_ENTRIES,
                "Cache size {} exceeds max {}",
                stats.size,
                TEST_MAX_ENTRIES
            );
            prop_assert_eq!(stats.size, stats.keys.len());
            prop_assert_eq!(stats.max_size, TEST_MAX_ENTRIES);
        }
    }

    // A value stored under any casing is readable under every other casing.
    #[test]
    fn prop_case_insensitive_lookup(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, DEFAULT_TTL_MS);

        store.set(&key, value.clone(), None);

        prop_assert_eq!(store.get(&key.to_uppercase()), Some(value.clone()));
        prop_assert_eq!(store.get(&key.to_lowercase()), Some(value));
        prop_assert_eq!(store.stats().keys, vec![normalize_key(&key)]);
    }

    // Filling to capacity and adding one more evicts the first inserted key,
    // no matter which keys were read in between.
    #[test]
    fn prop_fifo_eviction_order(
        keys in prop::collection::vec(key_strategy(), 2..12),
        reads in prop::collection::vec(0usize..12, 0..20),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 2);
        prop_assume!(!keys.iter().any(|k| normalize_key(k) == normalize_key(&new_key)));

        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, DEFAULT_TTL_MS);

        for key in &keys {
            store.set(key, format!("value_{key}"), None);
        }

        // Reads, including of the oldest key, never reorder eviction
        for index in reads {
            store.get(&keys[index % capacity]);
        }

        store.set(&new_key, new_value, None);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.has(&keys[0]), "Oldest key '{}' should have been evicted", keys[0]);
        prop_assert!(store.has(&new_key));
        for key in keys.iter().skip(1) {
            prop_assert!(store.has(key), "Key '{}' should still exist", key);
        }
    }

    // Below capacity, overwrites never change the key order.
    #[test]
    fn prop_overwrite_keeps_order(
        keys in prop::collection::vec(key_strategy(), 1..10),
        overwrites in prop::collection::vec((0usize..10, value_strategy()), 0..20)
    ) {
        let keys = unique_keys(keys);
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, DEFAULT_TTL_MS);

        for key in &keys {
            store.set(key, "initial".to_string(), None);
        }
        for (index, value) in overwrites {
            store.set(&keys[index % keys.len()].to_uppercase(), value, None);
        }

        let expected: Vec<String> = keys.iter().map(|k| normalize_key(k)).collect();
        prop_assert_eq!(store.stats().keys, expected);
    }

    // A restarted cache sees exactly what the previous one held.
    #[test]
    fn prop_snapshot_restart(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mirror = Arc::new(MemoryStore::new());
        let mut store: CacheStore<String> =
            CacheStore::with_mirror(TEST_MAX_ENTRIES, DEFAULT_TTL_MS, mirror.clone());

        for op in ops {
            apply(&mut store, op);
        }

        let mut restarted: CacheStore<String> =
            CacheStore::with_mirror(TEST_MAX_ENTRIES, DEFAULT_TTL_MS, mirror);

        let before = store.stats();
        prop_assert_eq!(&restarted.stats(), &before);
        for key in &before.keys {
            prop_assert_eq!(restarted.get(key), store.get(key));
        }
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_keys_normalizes() {
        let keys = unique_keys(vec!["Paris".into(), "PARIS".into(), "Oslo".into()]);
        assert_eq!(keys, vec!["Paris".to_string(), "Oslo".to_string()]);
    }

    #[test]
    fn test_any_string_is_a_valid_key() {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, DEFAULT_TTL_MS);

        store.set("", "empty".to_string(), None);
        store.set("São Paulo", "br".to_string(), None);

        assert_eq!(store.get("").as_deref(), Some("empty"));
        assert_eq!(store.get("SÃO PAULO").as_deref(), Some("br"));
    }
}
