//! Persistent key-value storage.
//!
//! A [`KvStore`] is an opaque string-keyed store. [`KvAdapter`] layers JSON
//! serialization on top and turns every failure into a logged fallback, so a
//! broken store degrades preferences to session-only instead of failing.

mod adapter;
mod memory;
mod sqlite;

pub use adapter::KvAdapter;
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

/// Errors raised by key-value stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Stored value is not valid JSON for the requested type.
    #[error("Failed to parse stored value for '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized for storage.
    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Opaque string-keyed storage.
pub trait KvStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Create the store selected by `config`.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn KvStore>, StorageError> {
    match config.backend {
        StorageBackend::Sqlite => {
            info!("Opening preference store at {}", config.path.display());
            Ok(Arc::new(SqliteKvStore::new(&config.path)?))
        }
        StorageBackend::Memory => {
            info!("Using in-memory preference store");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}
