use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{KvStore, StorageError};

/// Session-only store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryKvStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }
}
