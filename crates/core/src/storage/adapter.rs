use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{KvStore, StorageError};
use crate::metrics;

/// JSON view over a [`KvStore`] that never fails.
///
/// Reads fall back to the caller's default when the key is absent, the store
/// errors, or the stored value does not parse. Writes that fail are logged and
/// dropped.
#[derive(Clone)]
pub struct KvAdapter {
    store: Arc<dyn KvStore>,
}

impl KvAdapter {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Read `key`, or `default` if it is missing or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                let operation = match e {
                    StorageError::Parse { .. } => "parse",
                    _ => "read",
                };
                metrics::STORAGE_FAILURES
                    .with_label_values(&[operation])
                    .inc();
                warn!("Falling back to default for '{}': {}", key, e);
                default
            }
        }
    }

    /// Serialize and store `value` under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.store_value(key, value) {
            metrics::STORAGE_FAILURES.with_label_values(&["write"]).inc();
            warn!("Failed to persist '{}': {}", key, e);
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                key: key.to_string(),
                source,
            })
    }

    fn store_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    /// Store whose every call fails.
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Database("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Database("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_get_returns_default_for_missing_key() {
        let adapter = KvAdapter::new(Arc::new(MemoryKvStore::new()));
        let value: Vec<u64> = adapter.get("missing", vec![42]);
        assert_eq!(value, vec![42]);
    }

    #[test]
    fn test_set_then_get() {
        let adapter = KvAdapter::new(Arc::new(MemoryKvStore::new()));
        adapter.set("motionquest:favs", &vec![3u64, 1, 2]);
        let value: Vec<u64> = adapter.get("motionquest:favs", Vec::new());
        assert_eq!(value, vec![3, 1, 2]);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let store = Arc::new(MemoryKvStore::new());
        store.set("motionquest:favs", "not json at all").unwrap();

        let adapter = KvAdapter::new(store);
        let value: Vec<u64> = adapter.get("motionquest:favs", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_wrong_shape_falls_back() {
        let store = Arc::new(MemoryKvStore::new());
        store.set("motionquest:favs", "{\"a\": 1}").unwrap();

        let adapter = KvAdapter::new(store);
        let value: Vec<u64> = adapter.get("motionquest:favs", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let adapter = KvAdapter::new(Arc::new(BrokenStore));
        adapter.set("k", "v");
        let value: String = adapter.get("k", "fallback".to_string());
        assert_eq!(value, "fallback");
    }
}
