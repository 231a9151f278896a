// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as sane scrypt parameters and non-empty paths.

use crate::ConfigError;
use crate::model::KeywardenConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeywardenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // scrypt rejects log_n outside this range; catching it here gives a
    // config-shaped error instead of a key-derivation failure at first use.
    if !(10..=22).contains(&config.vault.kdf_log_n) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_log_n must be between 10 and 22, got {}",
                config.vault.kdf_log_n
            ),
        });
    }

    if config.vault.kdf_r == 0 {
        errors.push(ConfigError::Validation {
            message: "vault.kdf_r must be positive".to_string(),
        });
    }

    if config.vault.kdf_p == 0 {
        errors.push(ConfigError::Validation {
            message: "vault.kdf_p must be positive".to_string(),
        });
    }

    if config.vault.kdf_salt.is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.kdf_salt must not be empty".to_string(),
        });
    }

    if config.vault.stale_after_days <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.stale_after_days must be positive, got {}",
                config.vault.stale_after_days
            ),
        });
    }

    let level = config.app.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!("app.log_level `{level}` is not a recognized level"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
