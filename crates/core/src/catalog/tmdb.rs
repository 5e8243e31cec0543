//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access. The key and base URLs are optional in
//! configuration; a missing value surfaces as [`CatalogError::Config`] on the
//! first call that needs it, before any network I/O.

use reqwest::{Client, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::images::ImageUrls;
use super::types::{Genre, MovieDetail, MovieId, MovieSummary};
use super::CatalogError;
use crate::metrics;

const USER_AGENT: &str = concat!("motionquest/", env!("CARGO_PKG_VERSION"));

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL, e.g. https://api.themoviedb.org/3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL, e.g. https://image.tmdb.org/t/p/
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Language tag sent with every request.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            image_base_url: None,
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en-US".to_string()
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    language: String,
    images: ImageUrls,
}

impl TmdbClient {
    /// Create a new TMDB client.
    ///
    /// Only fails if the underlying HTTP client cannot be built; missing
    /// credentials are reported per call.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: non_blank(config.base_url),
            api_key: non_blank(config.api_key),
            language: config.language,
            images: ImageUrls::new(config.image_base_url),
        })
    }

    /// Image URL builder sharing this client's configuration.
    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    /// Search for movies by query.
    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        let request = self.search_request(query, page)?;

        debug!("TMDB movie search: query='{}', page={}", query, page);

        let result = self
            .fetch::<TmdbSearchResponse<TmdbMovieResult>>(request, "movie search")
            .await
            .map(|page| page.results.into_iter().map(MovieSummary::from).collect());

        record_outcome("search", &result);
        result
    }

    /// Get full details for a movie by TMDB ID.
    pub async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        let request = self.details_request(id)?;

        debug!("TMDB get movie: id={}", id);

        let result = self
            .fetch::<TmdbMovieDetails>(request, "movie")
            .await
            .map(MovieDetail::from);

        record_outcome("details", &result);
        result
    }

    fn search_request(&self, query: &str, page: u32) -> Result<Request, CatalogError> {
        let (url, api_key) = self.endpoint("/search/movie")?;
        let page = page.to_string();

        let request = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("query", query),
                ("page", page.as_str()),
                ("include_adult", "false"),
                ("language", self.language.as_str()),
            ])
            .build()?;

        Ok(request)
    }

    fn details_request(&self, id: MovieId) -> Result<Request, CatalogError> {
        let (url, api_key) = self.endpoint(&format!("/movie/{}", id))?;

        let request = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .build()?;

        Ok(request)
    }

    /// Resolve the full URL for `path` together with the API key.
    fn endpoint(&self, path: &str) -> Result<(String, &str), CatalogError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| CatalogError::Config("missing TMDB base URL".to_string()))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CatalogError::Config("missing TMDB API key".to_string()))?;

        Ok((format!("{}{}", base.trim_end_matches('/'), path), api_key))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: Request,
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn record_outcome<T>(operation: &str, result: &Result<T, CatalogError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::CATALOG_REQUESTS
        .with_label_values(&[operation, outcome])
        .inc();
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    vote_average: Option<f64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    vote_average: Option<f64>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    overview: Option<String>,
    backdrop_path: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbMovieResult> for MovieSummary {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            release_date: r.release_date,
            vote_average: r.vote_average,
            popularity: r.popularity,
            poster_path: r.poster_path,
        }
    }
}

impl From<TmdbMovieDetails> for MovieDetail {
    fn from(d: TmdbMovieDetails) -> Self {
        Self {
            id: d.id,
            title: d.title,
            release_date: d.release_date,
            vote_average: d.vote_average,
            runtime_minutes: d.runtime,
            genres: d
                .genres
                .into_iter()
                .map(|g| Genre { name: g.name })
                .collect(),
            overview: d.overview,
            backdrop_path: d.backdrop_path,
            poster_path: d.poster_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> TmdbConfig {
        TmdbConfig {
            api_key: Some("secret".to_string()),
            base_url: Some("https://api.themoviedb.org/3".to_string()),
            image_base_url: Some("https://image.tmdb.org/t/p/".to_string()),
            language: default_language(),
        }
    }

    fn query_value(request: &Request, name: &str) -> Option<String> {
        request
            .url()
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_search_request_parameters() {
        let client = TmdbClient::new(configured()).unwrap();
        let request = client.search_request("the dark knight & co", 1).unwrap();

        assert_eq!(request.url().path(), "/3/search/movie");
        assert_eq!(query_value(&request, "api_key").as_deref(), Some("secret"));
        assert_eq!(
            query_value(&request, "query").as_deref(),
            Some("the dark knight & co")
        );
        assert_eq!(query_value(&request, "page").as_deref(), Some("1"));
        assert_eq!(
            query_value(&request, "include_adult").as_deref(),
            Some("false")
        );
        assert_eq!(query_value(&request, "language").as_deref(), Some("en-US"));
        assert!(request
            .url()
            .query()
            .unwrap()
            .contains("query=the+dark+knight+%26+co"));
    }

    #[test]
    fn test_details_request_parameters() {
        let mut config = configured();
        config.base_url = Some("https://api.themoviedb.org/3/".to_string());
        let client = TmdbClient::new(config).unwrap();
        let request = client.details_request(603).unwrap();

        assert_eq!(request.url().path(), "/3/movie/603");
        assert_eq!(query_value(&request, "language").as_deref(), Some("en-US"));
        assert!(query_value(&request, "query").is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let mut config = configured();
        config.api_key = None;
        let client = TmdbClient::new(config).unwrap();

        let err = client.search_movies("batman", 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Config(ref m) if m.contains("API key")));

        let err = client.get_movie_details(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[tokio::test]
    async fn test_blank_base_url_is_missing() {
        let mut config = configured();
        config.base_url = Some("   ".to_string());
        let client = TmdbClient::new(config).unwrap();

        let err = client.search_movies("batman", 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Config(ref m) if m.contains("base URL")));
    }

    #[test]
    fn test_movie_result_conversion() {
        let raw = r#"{
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "release_date": "1999-03-30",
                 "vote_average": 8.2, "popularity": 83.1, "poster_path": "/m.jpg",
                 "adult": false, "genre_ids": [28]},
                {"id": 7, "title": "Untitled", "release_date": null,
                 "vote_average": null, "popularity": null, "poster_path": null}
            ],
            "total_pages": 1,
            "total_results": 2
        }"#;

        let parsed: TmdbSearchResponse<TmdbMovieResult> = serde_json::from_str(raw).unwrap();
        let movies: Vec<MovieSummary> = parsed.results.into_iter().map(Into::into).collect();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 603);
        assert_eq!(movies[0].year(), Some(1999));
        assert_eq!(movies[0].popularity, Some(83.1));
        assert_eq!(movies[1].rating(), None);
        assert_eq!(movies[1].year(), None);
    }

    #[test]
    fn test_movie_details_conversion() {
        let raw = r#"{
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "overview": "A computer hacker...",
            "backdrop_path": "/b.jpg",
            "poster_path": "/p.jpg"
        }"#;

        let details: TmdbMovieDetails = serde_json::from_str(raw).unwrap();
        let movie: MovieDetail = details.into();

        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.genres[1].name, "Science Fiction");
        assert_eq!(movie.backdrop_path.as_deref(), Some("/b.jpg"));
    }
}
