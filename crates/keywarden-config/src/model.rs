// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Keywarden.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Keywarden configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardenConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vault key-derivation and staleness settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("keywarden/keywarden.db").display().to_string())
        .unwrap_or_else(|| "keywarden.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Vault key-derivation and staleness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// scrypt cost parameter as log2(N) (default: 14, i.e. N = 16384).
    #[serde(default = "default_kdf_log_n")]
    pub kdf_log_n: u8,

    /// scrypt block size parameter r (default: 8).
    #[serde(default = "default_kdf_r")]
    pub kdf_r: u32,

    /// scrypt parallelism parameter p (default: 1).
    #[serde(default = "default_kdf_p")]
    pub kdf_p: u32,

    /// Fixed, non-secret key-derivation salt. One value for the whole vault;
    /// changing it makes every stored blob undecryptable.
    #[serde(default = "default_kdf_salt")]
    pub kdf_salt: String,

    /// Age in days past which a password counts as stale (default: 90).
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_log_n: default_kdf_log_n(),
            kdf_r: default_kdf_r(),
            kdf_p: default_kdf_p(),
            kdf_salt: default_kdf_salt(),
            stale_after_days: default_stale_after_days(),
        }
    }
}

fn default_kdf_log_n() -> u8 {
    14
}

fn default_kdf_r() -> u32 {
    8
}

fn default_kdf_p() -> u32 {
    1
}

fn default_kdf_salt() -> String {
    "keywarden-kdf-v1".to_string()
}

fn default_stale_after_days() -> i64 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_defaults_match_scrypt_recommendations() {
        let config = VaultConfig::default();
        assert_eq!(config.kdf_log_n, 14);
        assert_eq!(config.kdf_r, 8);
        assert_eq!(config.kdf_p, 1);
        assert_eq!(config.stale_after_days, 90);
        assert!(!config.kdf_salt.is_empty());
    }

    #[test]
    fn config_survives_toml_roundtrip() {
        let config = KeywardenConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let back: KeywardenConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back.vault.kdf_log_n, config.vault.kdf_log_n);
        assert_eq!(back.storage.database_path, config.storage.database_path);
    }
}
