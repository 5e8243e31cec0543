use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Debounce delay is not 0
/// - Minimum query length is not 0
///
/// Missing TMDB settings are not an error here; they surface on the first
/// request that needs them.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "search.debounce_ms cannot be 0".to_string(),
        ));
    }

    if config.search.min_query_len == 0 {
        return Err(ConfigError::ValidationError(
            "search.min_query_len cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_debounce_fails() {
        let config = Config {
            search: SearchConfig {
                debounce_ms: 0,
                min_query_len: 2,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_min_query_len_fails() {
        let config = Config {
            search: SearchConfig {
                debounce_ms: 500,
                min_query_len: 0,
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
