//! A single user session of the movie search front end.
//!
//! The session wires typed input through the debouncer into the search
//! controller and combines the raw results with favorites and sort preferences
//! into the list the user sees.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::{MovieCatalog, MovieId, MovieSummary};
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::detail::{DetailController, DetailState, ModalEvent};
use crate::favorites::FavoritesStore;
use crate::search::{SearchController, SearchState};
use crate::storage::KvAdapter;
use crate::view::{derive, SortDirection, SortKey, SortPreferences, SortSpec};

/// What the result area shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    /// Nothing searched yet; prompt for more input.
    Hint,
    Loading,
    Error(String),
    /// Filtered and sorted results (possibly empty).
    Results(Vec<MovieSummary>),
}

pub struct Session {
    query: String,
    debouncer: Debouncer<String>,
    forwarder: JoinHandle<()>,
    search: Arc<SearchController>,
    details: DetailController,
    favorites: FavoritesStore,
    sort: SortPreferences,
    favorites_only: bool,
}

impl Session {
    /// Start a session. Must be called from within a tokio runtime.
    pub fn new(catalog: Arc<dyn MovieCatalog>, storage: KvAdapter, config: &SearchConfig) -> Self {
        let search = Arc::new(SearchController::with_min_query_len(
            Arc::clone(&catalog),
            config.min_query_len,
        ));
        let details = DetailController::new(catalog);

        let (debouncer, mut settled) = Debouncer::<String>::spawn(config.debounce());
        let forward_to = Arc::clone(&search);
        let forwarder = tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                forward_to.set_query(query.as_str());
            }
            debug!("Query forwarder stopped");
        });

        Self {
            query: String::new(),
            debouncer,
            forwarder,
            search,
            details,
            favorites: FavoritesStore::load(storage.clone()),
            sort: SortPreferences::load(storage),
            favorites_only: false,
        }
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Replace the raw query text. The search fires once typing settles.
    pub fn type_query(&mut self, raw: impl Into<String>) {
        self.query = raw.into();
        self.debouncer.push(self.query.clone());
    }

    pub fn clear_query(&mut self) {
        self.type_query(String::new());
    }

    /// Raw (untrimmed) query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    // =========================================================================
    // Result list
    // =========================================================================

    /// The list view for the current search state, filters and sort.
    pub fn list_view(&self) -> ListView {
        match self.search.state() {
            SearchState::Idle => ListView::Hint,
            SearchState::Loading { .. } => ListView::Loading,
            SearchState::Failed { message, .. } => ListView::Error(message),
            SearchState::Loaded { movies, .. } => ListView::Results(derive(
                &movies,
                &self.favorites.ids(),
                self.favorites_only,
                self.sort.spec(),
            )),
        }
    }

    /// The favorites-only filter is offered only while there are raw results.
    pub fn favorites_toggle_available(&self) -> bool {
        self.search
            .state()
            .movies()
            .is_some_and(|movies| !movies.is_empty())
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn set_favorites_only(&mut self, enabled: bool) {
        self.favorites_only = enabled;
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Flip and persist favorite status; returns the new status.
    pub fn toggle_favorite(&self, id: MovieId) -> bool {
        self.favorites.toggle(id)
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    pub fn sort_spec(&self) -> SortSpec {
        self.sort.spec()
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort.set_key(key);
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort.set_direction(direction);
    }

    pub fn toggle_sort_direction(&mut self) -> SortDirection {
        self.sort.toggle_direction()
    }

    // =========================================================================
    // Details
    // =========================================================================

    pub fn open_details(&self, id: MovieId) -> Option<ModalEvent> {
        self.details.select(id)
    }

    pub fn close_details(&self) -> Option<ModalEvent> {
        self.details.clear()
    }

    pub fn detail_state(&self) -> DetailState {
        self.details.state()
    }

    pub fn subscribe_details(&self) -> watch::Receiver<DetailState> {
        self.details.subscribe()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.forwarder.abort();
        self.search.shutdown();
    }
}
