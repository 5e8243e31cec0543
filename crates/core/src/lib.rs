pub mod catalog;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod favorites;
pub mod generation;
pub mod metrics;
pub mod search;
pub mod session;
pub mod storage;
pub mod testing;
pub mod view;

pub use catalog::{
    CatalogError, Genre, ImageSize, ImageUrls, MovieCatalog, MovieDetail, MovieId, MovieSummary,
    TmdbClient, TmdbConfig,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig, SearchConfig, StorageBackend, StorageConfig,
};
pub use debounce::Debouncer;
pub use detail::{DetailController, DetailState, ModalEvent};
pub use favorites::FavoritesStore;
pub use generation::{Generation, GenerationCell};
pub use search::{SearchController, SearchState};
pub use session::{ListView, Session};
pub use storage::{create_store, KvAdapter, KvStore, MemoryKvStore, SqliteKvStore, StorageError};
pub use view::{SortDirection, SortKey, SortPreferences, SortSpec};
