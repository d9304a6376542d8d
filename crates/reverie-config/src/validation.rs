// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as connection string schemes and window sizes.

use crate::diagnostic::ConfigError;
use crate::model::ReverieConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ReverieConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate agent name is not empty
    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    // Validate context window and recent limit are usable
    if config.memory.context_window < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.context_window must be at least 1, got {}",
                config.memory.context_window
            ),
        });
    }

    if config.memory.recent_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.recent_limit must be at least 1, got {}",
                config.memory.recent_limit
            ),
        });
    }

    if config.memory.connect_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.connect_timeout_secs must be at least 1, got {}",
                config.memory.connect_timeout_secs
            ),
        });
    }

    // Validate connection strings carry the expected scheme when set
    if let Some(url) = &config.memory.cache_url
        && !(url.starts_with("redis://") || url.starts_with("rediss://"))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.cache_url must start with redis:// or rediss://, got `{url}`"
            ),
        });
    }

    if let Some(uri) = &config.memory.durable_uri
        && !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://"))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.durable_uri must start with mongodb:// or mongodb+srv://, got `{uri}`"
            ),
        });
    }

    // Validate database and collection names are not empty
    if config.memory.database.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.database must not be empty".to_string(),
        });
    }

    if config.memory.collection.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.collection must not be empty".to_string(),
        });
    }

    if config.auth.users_collection.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "auth.users_collection must not be empty".to_string(),
        });
    }

    // Validate sampling temperature range
    if !(0.0..=2.0).contains(&config.groq.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "groq.temperature must be between 0.0 and 2.0, got {}",
                config.groq.temperature
            ),
        });
    }

    if config.groq.max_tokens < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "groq.max_tokens must be at least 1, got {}",
                config.groq.max_tokens
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ReverieConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_context_window_fails_validation() {
        let mut config = ReverieConfig::default();
        config.memory.context_window = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("context_window"))));
    }

    #[test]
    fn bad_cache_scheme_fails_validation() {
        let mut config = ReverieConfig::default();
        config.memory.cache_url = Some("http://localhost:6379".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("cache_url"))));
    }

    #[test]
    fn bad_durable_scheme_fails_validation() {
        let mut config = ReverieConfig::default();
        config.memory.durable_uri = Some("postgres://localhost".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("durable_uri"))));
    }

    #[test]
    fn srv_scheme_passes_validation() {
        let mut config = ReverieConfig::default();
        config.memory.durable_uri = Some("mongodb+srv://cluster.example.net".to_string());
        config.memory.cache_url = Some("rediss://cache.example.net:6380".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = ReverieConfig::default();
        config.groq.temperature = 2.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("temperature"))));
    }

    #[test]
    fn empty_collection_fails_validation() {
        let mut config = ReverieConfig::default();
        config.memory.collection = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("memory.collection"))));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = ReverieConfig::default();
        config.memory.context_window = 0;
        config.memory.recent_limit = 0;
        config.groq.temperature = -1.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
