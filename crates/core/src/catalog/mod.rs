//! Movie catalog access.
//!
//! This module provides the TMDB client used for searching movies and
//! fetching details on demand, plus image URL construction for posters
//! and backdrops.

mod images;
mod tmdb;
mod types;

pub use images::{ImageSize, ImageUrls};
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required configuration value (API key, base URL) is absent.
    #[error("Client not configured: {0}")]
    Config(String),

    /// The API answered with a non-success status.
    #[error("TMDB error {status}")]
    Api { status: u16, message: String },

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl CatalogError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Config(_) => "config",
            CatalogError::Api { .. } => "api",
            CatalogError::Http(_) => "http",
            CatalogError::Parse(_) => "parse",
        }
    }
}

/// Source of movie search results and details.
///
/// Every call is a fresh round trip; implementations do not retry or cache.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies matching `query`, returning the requested page.
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Get full details for a single movie.
    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetail, CatalogError>;
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        TmdbClient::search_movies(self, query, page).await
    }

    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        TmdbClient::get_movie_details(self, id).await
    }
}
