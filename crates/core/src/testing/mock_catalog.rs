//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, MovieCatalog, MovieDetail, MovieId, MovieSummary};

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results per query and details per id
/// - Delay individual responses to force out-of-order completion
/// - Track requests for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use motionquest_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.set_search_results("bat", vec![fixtures::movie(1, "Batman")]).await;
/// catalog.set_search_delay("bat", Duration::from_millis(300)).await;
///
/// let results = catalog.search_movies("bat", 1).await?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(catalog.search_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// Search results by query.
    results: Arc<RwLock<HashMap<String, Vec<MovieSummary>>>>,
    /// Movie details by ID.
    details: Arc<RwLock<HashMap<MovieId, MovieDetail>>>,
    /// Artificial latency per query.
    search_delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Artificial latency per movie ID.
    detail_delays: Arc<RwLock<HashMap<MovieId, Duration>>>,
    /// Recorded (query, page) searches.
    searches: Arc<RwLock<Vec<(String, u32)>>>,
    /// Recorded detail lookups.
    detail_requests: Arc<RwLock<Vec<MovieId>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the results returned for `query`.
    pub async fn set_search_results(&self, query: &str, movies: Vec<MovieSummary>) {
        self.results
            .write()
            .await
            .insert(query.to_string(), movies);
    }

    /// Add a movie detail record.
    pub async fn add_details(&self, detail: MovieDetail) {
        self.details.write().await.insert(detail.id, detail);
    }

    /// Delay responses for `query` by `delay`.
    pub async fn set_search_delay(&self, query: &str, delay: Duration) {
        self.search_delays
            .write()
            .await
            .insert(query.to_string(), delay);
    }

    /// Delay detail responses for `id` by `delay`.
    pub async fn set_details_delay(&self, id: MovieId, delay: Duration) {
        self.detail_delays.write().await.insert(id, delay);
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Get recorded (query, page) searches in issue order.
    pub async fn recorded_searches(&self) -> Vec<(String, u32)> {
        self.searches.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Get recorded detail lookups in issue order.
    pub async fn recorded_detail_requests(&self) -> Vec<MovieId> {
        self.detail_requests.read().await.clone()
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        self.searches
            .write()
            .await
            .push((query.to_string(), page));

        // Error and delay are captured at issue time, like a real request.
        let error = self.take_error().await;
        let delay = self.search_delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = error {
            return Err(error);
        }

        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        self.detail_requests.write().await.push(id);

        let error = self.take_error().await;
        let delay = self.detail_delays.read().await.get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = error {
            return Err(error);
        }

        self.details
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::Api {
                status: 404,
                message: format!("Movie ID {}", id),
            })
    }
}
