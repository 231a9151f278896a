// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open operations over [`EncryptedBlob`]s.
//!
//! Every call to [`seal`] generates a fresh random 16-byte IV via the system
//! CSPRNG. IV reuse would be catastrophic for GCM security. The stored
//! format keeps the 16-byte authentication tag as its own blob segment, so
//! tampering with either the ciphertext or the tag fails tag verification.
//!
//! AEAD is the only integrity channel this vault has: a substituted or
//! corrupted ciphertext must surface at decrypt time, never "succeed" with
//! garbage plaintext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit, OsRng, rand_core::RngCore};
use aes_gcm::{AesGcm, aes::Aes256};

use keywarden_core::types::{IV_LEN, TAG_LEN};
use keywarden_core::{EncryptedBlob, VaultError};

use crate::kdf::DerivedKey;

// AES-256-GCM parameterized with a 16-byte nonce to match the stored
// iv:tag:ciphertext format (the usual 96-bit-nonce alias cannot open
// existing blobs).
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypt plaintext under the derived key with a fresh random 16-byte IV.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<EncryptedBlob, VaultError> {
    let cipher = Aes256Gcm16::new(GenericArray::from_slice(key.as_ref()));

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut ciphertext = cipher
        .encrypt(GenericArray::from_slice(&iv), plaintext)
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".to_string()))?;

    // The aead API appends the tag; the stored format keeps it separate.
    let auth_tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

    Ok(EncryptedBlob {
        iv: iv.to_vec(),
        auth_tag,
        ciphertext,
    })
}

/// Decrypt a sealed blob.
///
/// Fails with [`VaultError::Authentication`] when the tag does not verify
/// (wrong key, tampered ciphertext, corrupted IV) -- no plaintext is ever
/// returned in that case, and the underlying AEAD compares tags in constant
/// time. A structurally invalid blob fails with
/// [`VaultError::MalformedBlob`] before any cryptography runs.
pub fn open(blob: &EncryptedBlob, key: &DerivedKey) -> Result<Vec<u8>, VaultError> {
    if blob.iv.len() != IV_LEN {
        return Err(VaultError::MalformedBlob(format!(
            "iv must be {IV_LEN} bytes, got {}",
            blob.iv.len()
        )));
    }
    if blob.auth_tag.len() != TAG_LEN {
        return Err(VaultError::MalformedBlob(format!(
            "auth tag must be {TAG_LEN} bytes, got {}",
            blob.auth_tag.len()
        )));
    }

    let cipher = Aes256Gcm16::new(GenericArray::from_slice(key.as_ref()));

    let mut tagged = blob.ciphertext.clone();
    tagged.extend_from_slice(&blob.auth_tag);

    cipher
        .decrypt(GenericArray::from_slice(&blob.iv), tagged.as_slice())
        .map_err(|_| VaultError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::KEY_LEN;
    use zeroize::Zeroizing;

    fn random_key() -> DerivedKey {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(key.as_mut());
        key
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = random_key();
        let plaintext = b"correct horse battery staple";

        let blob = seal(plaintext, &key).unwrap();
        let decrypted = open(&blob, &key).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn sealing_twice_uses_fresh_ivs() {
        let key = random_key();
        let blob1 = seal(b"same input", &key).unwrap();
        let blob2 = seal(b"same input", &key).unwrap();

        assert_ne!(blob1.iv, blob2.iv);
        assert_ne!(blob1.ciphertext, blob2.ciphertext);
    }

    #[test]
    fn open_with_wrong_key_fails_closed() {
        let key1 = random_key();
        let key2 = random_key();

        let blob = seal(b"secret data", &key1).unwrap();
        let err = open(&blob, &key2).unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn any_flipped_ciphertext_bit_is_detected() {
        let key = random_key();
        let blob = seal(b"do not tamper", &key).unwrap();

        for byte in 0..blob.ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered.ciphertext[byte] ^= 1 << bit;
                let err = open(&tampered, &key).unwrap_err();
                assert!(
                    matches!(err, VaultError::Authentication),
                    "flip at byte {byte} bit {bit} must fail authentication"
                );
            }
        }
    }

    #[test]
    fn tampered_auth_tag_is_detected() {
        let key = random_key();
        let mut blob = seal(b"payload", &key).unwrap();
        blob.auth_tag[0] ^= 0x01;

        let err = open(&blob, &key).unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn corrupted_iv_is_detected() {
        let key = random_key();
        let mut blob = seal(b"payload", &key).unwrap();
        blob.iv[3] ^= 0x80;

        let err = open(&blob, &key).unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn structurally_bad_blob_is_malformed_not_authentication() {
        let key = random_key();
        let good = seal(b"payload", &key).unwrap();

        let mut short_iv = good.clone();
        short_iv.iv.truncate(12);
        assert!(matches!(
            open(&short_iv, &key).unwrap_err(),
            VaultError::MalformedBlob(_)
        ));

        let mut short_tag = good.clone();
        short_tag.auth_tag.truncate(8);
        assert!(matches!(
            open(&short_tag, &key).unwrap_err(),
            VaultError::MalformedBlob(_)
        ));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = random_key();
        let blob = seal(b"", &key).unwrap();
        assert!(blob.ciphertext.is_empty());
        assert_eq!(open(&blob, &key).unwrap(), b"");
    }
}
