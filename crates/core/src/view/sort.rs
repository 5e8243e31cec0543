//! Sort specification and its persisted preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::KvAdapter;

/// Storage key for the sort key.
pub const SORT_BY_KEY: &str = "motionquest:sortBy";
/// Storage key for the sort direction.
pub const SORT_DIR_KEY: &str = "motionquest:sortDir";

/// Primary sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Rating,
    Year,
}

/// Direction applied to the primary key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Key and direction of the result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Rating => write!(f, "rating"),
            SortKey::Year => write!(f, "year"),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "year" => Ok(SortKey::Year),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Sort spec persisted across sessions as two independent keys.
pub struct SortPreferences {
    storage: KvAdapter,
    spec: SortSpec,
}

impl SortPreferences {
    /// Load the persisted spec; each half falls back to its default on its own.
    pub fn load(storage: KvAdapter) -> Self {
        let spec = SortSpec {
            key: storage.get(SORT_BY_KEY, SortKey::default()),
            direction: storage.get(SORT_DIR_KEY, SortDirection::default()),
        };
        Self { storage, spec }
    }

    pub fn spec(&self) -> SortSpec {
        self.spec
    }

    pub fn set_key(&mut self, key: SortKey) {
        self.spec.key = key;
        self.storage.set(SORT_BY_KEY, &key);
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        self.spec.direction = direction;
        self.storage.set(SORT_DIR_KEY, &direction);
    }

    pub fn toggle_direction(&mut self) -> SortDirection {
        let direction = self.spec.direction.toggled();
        self.set_direction(direction);
        direction
    }
}
