use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `MOTIONQUEST_TMDB__API_KEY`.
const ENV_PREFIX: &str = "MOTIONQUEST_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::new())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
