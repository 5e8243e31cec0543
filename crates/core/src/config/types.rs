use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::TmdbConfig;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::search::DEFAULT_MIN_QUERY_LEN;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Search input behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period before a typed query is searched, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum trimmed query length that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}

/// Preference storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("motionquest.db")
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file at `storage.path`
    #[default]
    Sqlite,
    /// Session-only, nothing survives a restart
    Memory,
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub tmdb: SanitizedTmdbConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    pub language: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            tmdb: SanitizedTmdbConfig {
                api_key_configured: config
                    .tmdb
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.trim().is_empty()),
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                language: config.tmdb.language.clone(),
            },
            search: config.search.clone(),
            storage: config.storage.clone(),
        }
    }
}
