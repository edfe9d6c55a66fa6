//! In-memory key-value store.

use hotai_core::error::{HotaiError, Result};
use hotai_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Non-durable [`KeyValueStore`] used as a test double and for ephemeral
/// sessions.
///
/// It can be switched into an "unavailable" mode where every write fails,
/// to exercise the fatal-storage path.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with raw entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.entries.write().unwrap_or_else(PoisonError::into_inner);
            for (k, v) in entries {
                map.insert(k.into(), v.into());
            }
        }
        store
    }

    /// Number of successful `set_raw` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Removes `key`, as if the user had cleared that part of storage.
    pub fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_raw(&self, key: &str, text: &str) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(HotaiError::storage(format!(
                "memory store unavailable, cannot write '{}'",
                key
            )));
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotai_core::storage::set_json;

    #[test]
    fn test_round_trip_and_missing() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("settings").unwrap().is_none());
        set_json(&store, "settings", &serde_json::json!({"apiKey": "x"})).unwrap();
        assert_eq!(store.get("settings").unwrap().as_deref(), Some(r#"{"apiKey":"x"}"#));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_unavailable_rejects_writes_but_keeps_data() {
        let store = MemoryKeyValueStore::with_entries([("version", "1")]);
        store.set_unavailable(true);
        assert!(store.set_raw("version", "2").unwrap_err().is_storage());
        assert_eq!(store.get("version").unwrap().as_deref(), Some("1"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_remove() {
        let store = MemoryKeyValueStore::with_entries([("presets", "[]")]);
        store.remove("presets");
        assert!(store.get("presets").unwrap().is_none());
    }
}
