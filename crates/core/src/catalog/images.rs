//! Poster and backdrop URL construction.

use super::CatalogError;

/// TMDB image size tags used by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Backdrop,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Poster => "w342",
            ImageSize::Backdrop => "w780",
        }
    }
}

/// Builds `{base}{size}{path}` image URLs.
#[derive(Debug, Clone, Default)]
pub struct ImageUrls {
    base: Option<String>,
}

impl ImageUrls {
    pub fn new(base: Option<String>) -> Self {
        Self {
            base: base.filter(|b| !b.trim().is_empty()),
        }
    }

    /// Build the URL for `path` at `size`.
    ///
    /// An absent path yields an empty string so the caller renders its
    /// fallback without issuing a request. A missing image base is a
    /// configuration error.
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> Result<String, CatalogError> {
        let base = self
            .base
            .as_deref()
            .ok_or_else(|| CatalogError::Config("missing TMDB image base URL".to_string()))?;

        match path {
            Some(p) if !p.is_empty() => Ok(format!("{}{}{}", base, size.as_str(), p)),
            _ => Ok(String::new()),
        }
    }
}
