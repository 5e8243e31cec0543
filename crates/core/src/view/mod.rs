//! Sorting and filtering of search results for display.

mod derive;
mod sort;

pub use derive::derive;
pub use sort::{
    SortDirection, SortKey, SortPreferences, SortSpec, SORT_BY_KEY, SORT_DIR_KEY,
};
