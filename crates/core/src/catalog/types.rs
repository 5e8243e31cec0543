//! Types for movie catalog responses.

use serde::{Deserialize, Serialize};

/// Stable TMDB movie identifier.
pub type MovieId = u64;

/// A movie as it appears in a search result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Movie title.
    pub title: String,
    /// Release date (YYYY-MM-DD, sometimes partial or empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// TMDB popularity score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Vote average, if present and finite.
    pub fn rating(&self) -> Option<f64> {
        self.vote_average.filter(|v| v.is_finite())
    }
}

/// A genre attached to a movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
}

/// Full movie details, fetched on selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Movie title.
    pub title: String,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Genres in TMDB order.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Movie overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Backdrop path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl MovieDetail {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Genre names joined with ", ", or `None` when there are no genres.
    pub fn genre_list(&self) -> Option<String> {
        if self.genres.is_empty() {
            return None;
        }
        Some(
            self.genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Parse the year out of a TMDB release date.
///
/// Only the first four characters are considered; anything shorter or
/// non-numeric yields `None`.
pub fn release_year(release_date: Option<&str>) -> Option<i32> {
    let date = release_date?;
    let prefix = date.get(..4)?;
    prefix.parse().ok()
}
