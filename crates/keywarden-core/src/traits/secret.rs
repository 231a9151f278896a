// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner secret acquisition seam.

use secrecy::SecretString;

use crate::error::VaultError;
use crate::types::OwnerId;

/// Narrow capability mapping an owner to their key-derivation secret.
///
/// The secret comes from the external identity layer at call time. The vault
/// never stores it, never logs it, and holds it only as a [`SecretString`]
/// for the duration of one operation. Injecting this as a trait object keeps
/// secret lookup out of any ambient or global state.
pub trait OwnerSecretProvider: Send + Sync {
    fn secret_for(&self, owner: &OwnerId) -> Result<SecretString, VaultError>;
}

/// Blanket impl so plain closures can serve as providers in tests and small
/// embeddings.
impl<F> OwnerSecretProvider for F
where
    F: Fn(&OwnerId) -> Result<SecretString, VaultError> + Send + Sync,
{
    fn secret_for(&self, owner: &OwnerId) -> Result<SecretString, VaultError> {
        self(owner)
    }
}
