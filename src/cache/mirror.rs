//! Durable Mirror Module
//!
//! Single-slot key/value stores the cache snapshots itself into so a fresh
//! process can warm-start. A cache without a mirror runs memory-only.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::MirrorError;

/// Name of the slot holding the cache snapshot.
pub const MIRROR_KEY: &str = "cityCache";

// == Durable Store ==
/// Minimal string key/value storage, modelled on browser `localStorage`.
pub trait DurableStore: Send + Sync + std::fmt::Debug {
    /// Reads a slot. `Ok(None)` when the slot was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, MirrorError>;

    /// Replaces the whole content of a slot.
    fn set_item(&self, key: &str, value: &str) -> Result<(), MirrorError>;

    /// Deletes a slot. Deleting a missing slot is not an error.
    fn remove_item(&self, key: &str) -> Result<(), MirrorError>;
}

// == File Store ==
/// Stores each slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, MirrorError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written slot
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MirrorError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// == Memory Store ==
/// In-process store with an optional byte quota.
///
/// Counts every access so callers can observe how the cache uses it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store rejecting any slot value larger than `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Makes every subsequent access fail with [`MirrorError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of `get_item` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set_item` and `remove_item` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw slot content, bypassing the access counters.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn check_available(&self) -> Result<(), MirrorError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(MirrorError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl DurableStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, MirrorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let slots = self.slots.lock().map_err(|_| MirrorError::Unavailable)?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(MirrorError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }

        let mut slots = self.slots.lock().map_err(|_| MirrorError::Unavailable)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MirrorError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut slots = self.slots.lock().map_err(|_| MirrorError::Unavailable)?;
        slots.remove(key);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get_item(MIRROR_KEY).unwrap(), None);

        store.set_item(MIRROR_KEY, "[]").unwrap();
        assert_eq!(store.get_item(MIRROR_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested/cityCache.json").exists());

        store.set_item(MIRROR_KEY, "[1]").unwrap();
        assert_eq!(store.get_item(MIRROR_KEY).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set_item(MIRROR_KEY, "[]").unwrap();
        store.remove_item(MIRROR_KEY).unwrap();
        assert_eq!(store.get_item(MIRROR_KEY).unwrap(), None);

        // Removing twice is fine
        store.remove_item(MIRROR_KEY).unwrap();
    }

    #[test]
    fn test_file_store_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::new(blocker.join("cache"));
        assert!(store.set_item(MIRROR_KEY, "[]").is_err());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(4);

        store.set_item(MIRROR_KEY, "1234").unwrap();
        let result = store.set_item(MIRROR_KEY, "12345");
        assert!(matches!(result, Err(MirrorError::QuotaExceeded { .. })));

        // Previous content survives the rejected write
        assert_eq!(store.peek(MIRROR_KEY).as_deref(), Some("1234"));
    }

    #[test]
    fn test_memory_store_unavailable() {
        let store = MemoryStore::new();
        store.set_available(false);

        assert!(matches!(
            store.get_item(MIRROR_KEY),
            Err(MirrorError::Unavailable)
        ));
        assert!(matches!(
            store.set_item(MIRROR_KEY, "[]"),
            Err(MirrorError::Unavailable)
        ));
        assert_eq!(store.reads(), 1);
        assert_eq!(store.writes(), 1);
    }
}
