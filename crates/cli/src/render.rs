//! Plain-text rendering of session state.

use std::fmt::Write;

use motionquest_core::{
    DetailState, ImageSize, ImageUrls, ListView, MovieDetail, MovieId, MovieSummary, SortSpec,
};

const MISSING: &str = "—";

pub fn list(
    view: &ListView,
    min_query_len: usize,
    images: &ImageUrls,
    is_favorite: impl Fn(MovieId) -> bool,
) -> String {
    match view {
        ListView::Hint => format!("Type at least {} characters to search.", min_query_len),
        ListView::Loading => "Loading...".to_string(),
        ListView::Error(message) => format!("Error: {}", message),
        ListView::Results(movies) if movies.is_empty() => "No results.".to_string(),
        ListView::Results(movies) => {
            let mut out = String::new();
            for movie in movies {
                let _ = writeln!(out, "{}", card(movie, is_favorite(movie.id)));
                let poster = images
                    .url(movie.poster_path.as_deref(), ImageSize::Poster)
                    .unwrap_or_default();
                if !poster.is_empty() {
                    let _ = writeln!(out, "      {}", poster);
                }
            }
            out.trim_end().to_string()
        }
    }
}

fn card(movie: &MovieSummary, favorite: bool) -> String {
    format!(
        "{} {:>8}  {} ({})  {}",
        if favorite { "★" } else { "☆" },
        movie.id,
        movie.title,
        year(movie.year()),
        rating(movie.rating()),
    )
}

/// Text for the detail panel, or `None` when nothing is selected.
pub fn detail(state: &DetailState, images: &ImageUrls) -> Option<String> {
    match state {
        DetailState::NoSelection => None,
        DetailState::Loading { id } => Some(format!("Loading details for {}...", id)),
        DetailState::Failed { id, message } => {
            Some(format!("Could not load details for {}: {}", id, message))
        }
        DetailState::Loaded { detail } => Some(detail_panel(detail, images)),
    }
}

fn detail_panel(movie: &MovieDetail, images: &ImageUrls) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ({}) ===", movie.title, year(movie.year()));
    let _ = writeln!(
        out,
        "Rating: {}   Runtime: {}",
        rating(movie.vote_average.filter(|v| v.is_finite())),
        movie
            .runtime_minutes
            .map(|m| format!("{} min", m))
            .unwrap_or_else(|| MISSING.to_string()),
    );
    let _ = writeln!(
        out,
        "Genres: {}",
        movie.genre_list().unwrap_or_else(|| MISSING.to_string())
    );

    let overview = movie
        .overview
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or("No overview available.");
    let _ = writeln!(out, "\n{}", overview);

    for (label, path, size) in [
        ("Backdrop", movie.backdrop_path.as_deref(), ImageSize::Backdrop),
        ("Poster", movie.poster_path.as_deref(), ImageSize::Poster),
    ] {
        match images.url(path, size) {
            Ok(url) if !url.is_empty() => {
                let _ = writeln!(out, "{}: {}", label, url);
            }
            _ => {}
        }
    }

    out.push_str(":close to dismiss");
    out
}

pub fn status(
    sort: SortSpec,
    favorites_only: bool,
    toggle_available: bool,
    favorites: usize,
) -> String {
    let filter = match (toggle_available, favorites_only) {
        (false, _) => "",
        (true, true) => " | favorites only: on",
        (true, false) => " | favorites only: off",
    };
    format!(
        "[sort: {} {}{} | favorites: {}]",
        sort.key, sort.direction, filter, favorites
    )
}

fn year(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn rating(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| MISSING.to_string())
}
