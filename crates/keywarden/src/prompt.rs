// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault key acquisition via TTY prompt or KEYWARDEN_VAULT_KEY environment
//! variable.

use std::sync::OnceLock;

use secrecy::SecretString;

use keywarden_core::{OwnerSecretProvider, VaultError, types::OwnerId};

/// The environment variable name for providing the vault key.
pub const VAULT_KEY_ENV_VAR: &str = "KEYWARDEN_VAULT_KEY";

/// Get the vault key from environment variable or interactive TTY prompt.
///
/// Priority:
/// 1. `KEYWARDEN_VAULT_KEY` environment variable (for scripts/automation)
/// 2. Interactive TTY prompt via `rpassword` (for human operators)
///
/// Returns an error if neither source is available.
pub fn get_vault_key() -> Result<SecretString, VaultError> {
    // Check env var first.
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    // Try interactive prompt.
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Vault key: ");
        let key = rpassword::read_password()
            .map_err(|e| VaultError::Internal(format!("failed to read vault key: {e}")))?;
        if key.is_empty() {
            return Err(VaultError::Validation(
                "empty vault key not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(key));
    }

    Err(VaultError::Validation(
        "No vault key provided. Set KEYWARDEN_VAULT_KEY environment variable or run interactively."
            .to_string(),
    ))
}

/// Provider that prompts at most once per process and caches the key.
///
/// Commands that never touch sealed blobs (list, stats, gen) go through the
/// service without triggering a prompt.
#[derive(Default)]
pub struct PromptSecretProvider {
    cached: OnceLock<SecretString>,
}

impl PromptSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OwnerSecretProvider for PromptSecretProvider {
    fn secret_for(&self, _owner: &OwnerId) -> Result<SecretString, VaultError> {
        if let Some(secret) = self.cached.get() {
            return Ok(secret.clone());
        }
        let secret = get_vault_key()?;
        Ok(self.cached.get_or_init(|| secret).clone())
    }
}
