//! Persisted favorites set.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::catalog::MovieId;
use crate::storage::KvAdapter;

/// Storage key for the favorites list.
pub const FAVORITES_KEY: &str = "motionquest:favs";

/// User-curated set of favorite movie ids.
///
/// Readers get an immutable snapshot; every toggle builds a new set, swaps it
/// in and persists it as a sorted JSON array.
pub struct FavoritesStore {
    storage: KvAdapter,
    ids: RwLock<Arc<HashSet<MovieId>>>,
}

impl FavoritesStore {
    /// Load favorites from storage, falling back to an empty set.
    pub fn load(storage: KvAdapter) -> Self {
        let stored: Vec<MovieId> = storage.get(FAVORITES_KEY, Vec::new());
        let ids: HashSet<MovieId> = stored.into_iter().collect();
        debug!("Loaded {} favorites", ids.len());

        Self {
            storage,
            ids: RwLock::new(Arc::new(ids)),
        }
    }

    /// Whether `id` is a favorite.
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.ids().contains(&id)
    }

    /// Snapshot of the current set.
    pub fn ids(&self) -> Arc<HashSet<MovieId>> {
        let ids = self.ids.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&ids)
    }

    /// Flip membership of `id` and persist the result.
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&self, id: MovieId) -> bool {
        let mut guard = self.ids.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = HashSet::clone(&guard);
        let now_favorite = if next.remove(&id) {
            false
        } else {
            next.insert(id);
            true
        };

        let mut persisted: Vec<MovieId> = next.iter().copied().collect();
        persisted.sort_unstable();
        self.storage.set(FAVORITES_KEY, &persisted);

        *guard = Arc::new(next);
        debug!("Toggled favorite {} -> {}", id, now_favorite);
        now_favorite
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}
