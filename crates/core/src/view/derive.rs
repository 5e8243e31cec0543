//! Derivation of the displayed result list.

use std::cmp::Ordering;
use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::sort::{SortDirection, SortKey, SortSpec};
use crate::catalog::{MovieId, MovieSummary};

/// Filter and order raw search results for display.
///
/// Inputs are never mutated. With `favorites_only` set, only movies in
/// `favorites` are kept. Ordering:
///
/// 1. Primary key (rating or year) in `sort.direction`; movies without a
///    usable primary value always go last.
/// 2. Popularity, descending (missing counts as 0).
/// 3. Title ascending, ignoring accents and case, then exact.
/// 4. Id ascending, so the result does not depend on input order.
pub fn derive(
    results: &[MovieSummary],
    favorites: &HashSet<MovieId>,
    favorites_only: bool,
    sort: SortSpec,
) -> Vec<MovieSummary> {
    let mut visible: Vec<MovieSummary> = results
        .iter()
        .filter(|m| !favorites_only || favorites.contains(&m.id))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

fn primary_value(movie: &MovieSummary, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Rating => movie.rating(),
        SortKey::Year => movie.year().map(f64::from),
    }
}

fn compare(a: &MovieSummary, b: &MovieSummary, sort: SortSpec) -> Ordering {
    let primary = match (primary_value(a, sort.key), primary_value(b, sort.key)) {
        (Some(x), Some(y)) => match sort.direction {
            SortDirection::Ascending => x.total_cmp(&y),
            SortDirection::Descending => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    primary
        .then_with(|| popularity(b).total_cmp(&popularity(a)))
        .then_with(|| compare_titles(&a.title, &b.title))
        .then_with(|| a.id.cmp(&b.id))
}

fn popularity(movie: &MovieSummary) -> f64 {
    movie.popularity.filter(|p| p.is_finite()).unwrap_or(0.0)
}

/// Collation-style title order: base letters first (accents and case
/// ignored), then accents, then the exact text.
fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| a.cmp(b))
}

fn folded(title: &str) -> impl Iterator<Item = char> + '_ {
    title.nfd().flat_map(char::to_lowercase)
}

fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    folded(title).filter(|c| !is_combining_mark(*c))
}
