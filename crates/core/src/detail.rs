//! Detail fetch controller for the movie detail modal.
//!
//! Selecting a movie fetches its details; selecting another movie or clearing
//! the selection discards whatever is still in flight. Opening and closing the
//! modal is reported as [`ModalEvent`]s so the front end can run its own side
//! effects (scroll lock, focus) outside the core.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{MovieCatalog, MovieDetail, MovieId};
use crate::generation::GenerationCell;
use crate::metrics;

/// Visible state of the detail modal.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    NoSelection,
    Loading { id: MovieId },
    Loaded { detail: Arc<MovieDetail> },
    Failed { id: MovieId, message: String },
}

impl DetailState {
    /// The selected movie, if any.
    pub fn selected(&self) -> Option<MovieId> {
        match self {
            DetailState::NoSelection => None,
            DetailState::Loading { id } | DetailState::Failed { id, .. } => Some(*id),
            DetailState::Loaded { detail } => Some(detail.id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading { .. })
    }
}

/// Modal transitions the front end reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// The modal became visible for this movie.
    Opened(MovieId),
    /// The modal was dismissed.
    Closed,
}

/// Owns the per-selection detail fetch.
pub struct DetailController {
    catalog: Arc<dyn MovieCatalog>,
    state: Arc<GenerationCell<DetailState>>,
}

impl DetailController {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            catalog,
            state: Arc::new(GenerationCell::new(DetailState::NoSelection)),
        }
    }

    /// Select `id`, superseding any pending fetch.
    ///
    /// Returns [`ModalEvent::Opened`] only when nothing was selected before.
    pub fn select(&self, id: MovieId) -> Option<ModalEvent> {
        let was_open = self.state.borrow().selected().is_some();

        let generation = self.state.begin(DetailState::Loading { id });
        metrics::OPERATIONS_ISSUED
            .with_label_values(&["details"])
            .inc();
        debug!("Fetching details for {} (generation {})", id, generation.value());

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let next = match catalog.get_movie_details(id).await {
                Ok(detail) => DetailState::Loaded {
                    detail: Arc::new(detail),
                },
                Err(e) => DetailState::Failed {
                    id,
                    message: e.to_string(),
                },
            };

            if !state.resolve(generation, next) {
                metrics::STALE_RESPONSES
                    .with_label_values(&["details"])
                    .inc();
                debug!("Discarding stale details for {}", id);
            }
        });

        if was_open {
            None
        } else {
            Some(ModalEvent::Opened(id))
        }
    }

    /// Clear the selection, discarding any in-flight result.
    ///
    /// Returns [`ModalEvent::Closed`] only when something was selected.
    pub fn clear(&self) -> Option<ModalEvent> {
        let was_open = self.state.borrow().selected().is_some();
        self.state.reset(DetailState::NoSelection);
        was_open.then_some(ModalEvent::Closed)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DetailState {
        self.state.current()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }
}

impl Drop for DetailController {
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

    #[tokio::test]
    async fn test_select_loads_details() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.add_details(fixtures::detail(603, "The Matrix")).await;
        let controller = DetailController::new(catalog);
        let mut rx = controller.subscribe();

        assert_eq!(controller.select(603), Some(ModalEvent::Opened(603)));
        let state = rx.wait_for(|s| !s.is_loading()).await.unwrap().clone();

        match state {
            DetailState::Loaded { detail } => assert_eq!(detail.title, "The Matrix"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_selection() {
        let catalog = Arc::new(MockCatalog::new());
        catalog
            .set_next_error(CatalogError::Api {
                status: 401,
                message: String::new(),
            })
            .await;
        let controller = DetailController::new(catalog);
        let mut rx = controller.subscribe();

        controller.select(7);
        let state = rx.wait_for(|s| !s.is_loading()).await.unwrap().clone();

        assert_eq!(
            state,
            DetailState::Failed {
                id: 7,
                message: "TMDB error 401".to_string(),
            }
        );
        assert_eq!(state.selected(), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselect_discards_previous_fetch() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.add_details(fixtures::detail(1, "Slow")).await;
        catalog.add_details(fixtures::detail(2, "Fast")).await;
        catalog
            .set_details_delay(1, Duration::from_millis(300))
            .await;

        let controller = DetailController::new(catalog);
        assert_eq!(controller.select(1), Some(ModalEvent::Opened(1)));
        assert_eq!(controller.select(2), None);

        tokio::time::sleep(Duration::from_millis(500)).await;

        match controller.state() {
            DetailState::Loaded { detail } => assert_eq!(detail.id, 2),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight_fetch() {
        let catalog = Arc::new(MockCatalog::new());
        catalog.add_details(fixtures::detail(1, "Slow")).await;
        catalog
            .set_details_delay(1, Duration::from_millis(100))
            .await;

        let controller = DetailController::new(catalog);
        controller.select(1);
        assert_eq!(controller.clear(), Some(ModalEvent::Closed));
        assert_eq!(controller.clear(), None);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(controller.state(), DetailState::NoSelection);
    }
}
