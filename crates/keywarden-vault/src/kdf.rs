// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! scrypt key derivation from an owner secret.
//!
//! Derives a 32-byte key with configurable cost parameters (defaults
//! `log_n = 14, r = 8, p = 1`). Derivation is deterministic: the same
//! secret and salt always yield the same key, which is what keeps
//! previously sealed blobs decryptable.
//!
//! The salt is a fixed, non-secret string shared by all owners. That is a
//! known weakness of the stored format; see DESIGN.md before changing it,
//! because a new salt invalidates every existing blob.

use keywarden_core::VaultError;
use scrypt::Params;
use zeroize::Zeroizing;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A derived symmetric key, zeroed on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Derive a 32-byte key from an owner secret using scrypt.
pub fn derive_key(
    owner_secret: &str,
    salt: &str,
    log_n: u8,
    r: u32,
    p: u32,
) -> Result<DerivedKey, VaultError> {
    if owner_secret.is_empty() {
        return Err(VaultError::KeyDerivation(
            "owner secret must not be empty".to_string(),
        ));
    }

    let params = Params::new(log_n, r, p, KEY_LEN)
        .map_err(|e| VaultError::KeyDerivation(format!("invalid scrypt parameters: {e}")))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(
        owner_secret.as_bytes(),
        salt.as_bytes(),
        &params,
        output.as_mut(),
    )
    .map_err(|e| VaultError::KeyDerivation(format!("scrypt failed: {e}")))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const LOG_N: u8 = 4;

    #[test]
    fn derive_key_is_deterministic() {
        let key1 = derive_key("owner secret", "salt", LOG_N, 8, 1).unwrap();
        let key2 = derive_key("owner secret", "salt", LOG_N, 8, 1).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let key1 = derive_key("secret one", "salt", LOG_N, 8, 1).unwrap();
        let key2 = derive_key("secret two", "salt", LOG_N, 8, 1).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let key1 = derive_key("same secret", "salt-a", LOG_N, 8, 1).unwrap();
        let key2 = derive_key("same secret", "salt-b", LOG_N, 8, 1).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = derive_key("", "salt", LOG_N, 8, 1).unwrap_err();
        assert!(matches!(err, VaultError::KeyDerivation(_)));
    }

    #[test]
    fn output_is_32_bytes() {
        let key = derive_key("secret", "salt", LOG_N, 8, 1).unwrap();
        assert_eq!(key.len(), KEY_LEN);
    }
}
