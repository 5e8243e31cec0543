//! Search controller.
//!
//! Turns settled query strings into catalog searches and publishes a single
//! [`SearchState`]. A newer query always wins: results from superseded searches
//! are dropped even when their responses arrive last.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{MovieCatalog, MovieSummary};
use crate::generation::{Generation, GenerationCell};
use crate::metrics;

/// Minimum trimmed query length that triggers a search.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Only the first page is ever requested.
const FIRST_PAGE: u32 = 1;

/// Visible state of the result list.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// No query long enough to search.
    Idle,
    /// A search for `query` is in flight.
    Loading { query: String },
    /// The latest search succeeded.
    Loaded {
        query: String,
        movies: Arc<[MovieSummary]>,
    },
    /// The latest search failed.
    Failed { query: String, message: String },
}

impl SearchState {
    /// Raw results, if the latest search succeeded.
    pub fn movies(&self) -> Option<&[MovieSummary]> {
        match self {
            SearchState::Loaded { movies, .. } => Some(&movies[..]),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }
}

/// Owns the query-driven search lifecycle.
pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    state: Arc<GenerationCell<SearchState>>,
    min_query_len: usize,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self::with_min_query_len(catalog, DEFAULT_MIN_QUERY_LEN)
    }

    pub fn with_min_query_len(catalog: Arc<dyn MovieCatalog>, min_query_len: usize) -> Self {
        Self {
            catalog,
            state: Arc::new(GenerationCell::new(SearchState::Idle)),
            min_query_len,
        }
    }

    /// React to a new (debounced) query.
    ///
    /// Short queries reset to [`SearchState::Idle`] immediately, discarding any
    /// search in flight. Anything else supersedes the previous search, enters
    /// [`SearchState::Loading`] and spawns the request. Returns the generation
    /// of the spawned search, if any.
    pub fn set_query(&self, raw: &str) -> Option<Generation> {
        let query = raw.trim();

        if query.chars().count() < self.min_query_len {
            debug!("Query '{}' too short, resetting to idle", query);
            self.state.reset(SearchState::Idle);
            return None;
        }

        let query = query.to_string();
        let generation = self.state.begin(SearchState::Loading {
            query: query.clone(),
        });
        metrics::OPERATIONS_ISSUED
            .with_label_values(&["search"])
            .inc();
        debug!(
            "Starting search generation {} for '{}'",
            generation.value(),
            query
        );

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let next = match catalog.search_movies(&query, FIRST_PAGE).await {
                Ok(movies) => SearchState::Loaded {
                    query: query.clone(),
                    movies: movies.into(),
                },
                Err(e) => SearchState::Failed {
                    query: query.clone(),
                    message: e.to_string(),
                },
            };

            if !state.resolve(generation, next) {
                metrics::STALE_RESPONSES
                    .with_label_values(&["search"])
                    .inc();
                debug!(
                    "Discarding stale search generation {} for '{}'",
                    generation.value(),
                    query
                );
            }
        });

        Some(generation)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.current()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Whether `generation` is the most recent search.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.state.is_current(generation)
    }

    /// Discard any search in flight without changing the visible state.
    pub fn shutdown(&self) {
        self.state.supersede();
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.state.supersede();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::testing::{fixtures, MockCatalog};
    use std::time::Duration;

    async fn settled(rx: &mut watch::Receiver<SearchState>) -> SearchState {
        rx.wait_for(|s| !s.is_loading()).await.unwrap().clone()
    }

    #[tokio::test]
    async fn test_short_query_stays_idle_without_request() {
        let catalog = Arc::new(MockCatalog::new());
        let controller = SearchController::new(catalog.clone());
        let rx = controller.subscribe();

        assert!(controller.set_query("  a  ").is_none());
        assert!(controller.set_query("b").is_none());
        assert_eq!(controller.state(), SearchState::Idle);
        assert_eq!(catalog.search_count().await, 0);
        // Already idle, so subscribers are not woken.
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_search() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_search_results("bat", vec![fixtures::movie(1, "Batman")])
            .await;
        let controller = SearchController::new(catalog.clone());
        let mut rx = controller.subscribe();

        controller.set_query("  bat ");
        let state = settled(&mut rx).await;

        assert_eq!(state.movies().map(|m| m.len()), Some(1));
        let searches = catalog.recorded_searches().await;
        assert_eq!(searches, vec![("bat".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_failure_publishes_message() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_next_error(CatalogError::Api {
                status: 500,
                message: String::new(),
            })
            .await;
        let controller = SearchController::new(catalog);
        let mut rx = controller.subscribe();

        controller.set_query("batman");
        let state = settled(&mut rx).await;

        assert_eq!(
            state,
            SearchState::Failed {
                query: "batman".to_string(),
                message: "TMDB error 500".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_for_older_query_is_discarded() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_search_results("bat", vec![fixtures::movie(1, "Bat")])
            .await;
        catalog
            .set_search_results("batman", vec![fixtures::movie(2, "Batman")])
            .await;
        catalog
            .set_search_delay("bat", Duration::from_millis(300))
            .await;
        catalog
            .set_search_delay("batman", Duration::from_millis(10))
            .await;

        let controller = SearchController::new(catalog.clone());
        let first = controller.set_query("bat").unwrap();
        let second = controller.set_query("batman").unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(!controller.is_current(first));
        assert!(controller.is_current(second));
        let state = controller.state();
        let ids: Vec<_> = state.movies().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(catalog.search_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_mid_flight_resets_to_idle() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_search_results("batman", vec![fixtures::movie(2, "Batman")])
            .await;
        catalog
            .set_search_delay("batman", Duration::from_millis(100))
            .await;

        let controller = SearchController::new(catalog);
        controller.set_query("batman");
        assert!(controller.state().is_loading());

        controller.set_query("b");
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(controller.state(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_in_flight_results() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_search_delay("batman", Duration::from_millis(100))
            .await;

        let controller = SearchController::new(catalog);
        controller.set_query("batman");
        controller.shutdown();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(controller.state().is_loading());
    }
}
