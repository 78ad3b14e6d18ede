// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as known backend names, positive limits, and the
//! placeholder API key check.

use crate::diagnostic::ConfigError;
use crate::model::{MnemoConfig, PLACEHOLDER_API_KEY};

const KNOWN_BACKENDS: &[&str] = &["sqlite", "memory"];
const KNOWN_EMBEDDINGS: &[&str] = &["openrouter", "hash"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // API key: absent, empty, or still the sample placeholder is fatal.
    // A placeholder key would otherwise surface as a confusing 401 on
    // the first message instead of at startup.
    match config.openrouter.api_key.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ConfigError::Validation {
                message: "openrouter.api_key is not set; add it to mnemo.toml or set \
                          MNEMO_OPENROUTER_API_KEY"
                    .to_string(),
            });
        }
        Some(key) if key == PLACEHOLDER_API_KEY => {
            errors.push(ConfigError::Validation {
                message: format!(
                    "openrouter.api_key is still the sample placeholder `{PLACEHOLDER_API_KEY}`"
                ),
            });
        }
        Some(_) => {}
    }

    if !KNOWN_BACKENDS.contains(&config.storage.backend.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.backend `{}` is not recognized; valid backends: {}",
                config.storage.backend,
                KNOWN_BACKENDS.join(", ")
            ),
        });
    }

    if config.storage.backend == "sqlite" {
        if config.storage.database_path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "storage.database_path must not be empty".to_string(),
            });
        }
        if config.storage.vector_path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "storage.vector_path must not be empty".to_string(),
            });
        }
    }

    if !KNOWN_EMBEDDINGS.contains(&config.memory.embedding.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.embedding `{}` is not recognized; valid values: {}",
                config.memory.embedding,
                KNOWN_EMBEDDINGS.join(", ")
            ),
        });
    }

    if config.memory.max_chunk_size == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.max_chunk_size must be at least 1".to_string(),
        });
    }

    if config.memory.short_term_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.short_term_limit must be at least 1".to_string(),
        });
    }

    if config.memory.retrieval_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.retrieval_limit must be at least 1".to_string(),
        });
    }

    if config.memory.working_memory_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.working_memory_tokens must be at least 1".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.openrouter.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openrouter.temperature must be between 0.0 and 2.0, got {}",
                config.openrouter.temperature
            ),
        });
    }

    if config.openrouter.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openrouter.request_timeout_secs must be at least 1".to_string(),
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

    fn configured() -> MnemoConfig {
        let mut config = MnemoConfig::default();
        config.openrouter.api_key = Some("sk-or-v1-test".to_string());
        config
    }

    #[test]
    fn configured_config_validates() {
        assert!(validate_config(&configured()).is_ok());
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = MnemoConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("api_key"))));
    }

    #[test]
    fn placeholder_api_key_fails_validation() {
        let mut config = MnemoConfig::default();
        config.openrouter.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("placeholder"))));
    }

    #[test]
    fn unknown_backend_fails_validation() {
        let mut config = configured();
        config.storage.backend = "postgres".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("storage.backend"))));
    }

    #[test]
    fn memory_backend_skips_path_checks() {
        let mut config = configured();
        config.storage.backend = "memory".to_string();
        config.storage.database_path = "".to_string();
        config.storage.vector_path = "".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_chunk_size_fails_validation() {
        let mut config = configured();
        config.memory.max_chunk_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_chunk_size"))));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = configured();
        config.openrouter.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("temperature"))));
    }

    #[test]
    fn all_errors_collected_not_fail_fast() {
        let mut config = MnemoConfig::default();
        config.storage.backend = "postgres".to_string();
        config.memory.retrieval_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
