//! Testing utilities and mock implementations.
//!
//! This module provides a mock catalog so the search pipeline can be exercised
//! without network access, plus fixtures for building movies.
//!
//! # Example
//!
//! ```rust,ignore
//! use motionquest_core::testing::{MockCatalog, fixtures};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! catalog.set_search_results("bat", vec![fixtures::movie(1, "Batman")]).await;
//!
//! let controller = SearchController::new(catalog.clone());
//! controller.set_query("bat");
//! ```

mod mock_catalog;

pub use mock_catalog::MockCatalog;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Genre, MovieDetail, MovieId, MovieSummary};

    /// Create a movie with only an id and title.
    pub fn movie(id: MovieId, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: None,
            vote_average: None,
            popularity: None,
            poster_path: None,
        }
    }

    /// Create a movie with the fields the sort engine looks at.
    pub fn rated_movie(
        id: MovieId,
        title: &str,
        vote_average: Option<f64>,
        release_date: Option<&str>,
        popularity: Option<f64>,
    ) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: release_date.map(str::to_string),
            vote_average,
            popularity,
            poster_path: Some(format!("/poster-{}.jpg", id)),
        }
    }

    /// Create full movie details with reasonable defaults.
    pub fn detail(id: MovieId, title: &str) -> MovieDetail {
        MovieDetail {
            id,
            title: title.to_string(),
            release_date: Some("1999-03-30".to_string()),
            vote_average: Some(8.2),
            runtime_minutes: Some(136),
            genres: vec![
                Genre {
                    name: "Action".to_string(),
                },
                Genre {
                    name: "Science Fiction".to_string(),
                },
            ],
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
        }
    }

    /// The two-movie result list for the query "bat".
    pub fn bat_results() -> Vec<MovieSummary> {
        vec![
            rated_movie(1, "Batman", Some(8.2), Some("2022-03-01"), Some(50.0)),
            rated_movie(2, "Bat", None, None, Some(10.0)),
        ]
    }
}
