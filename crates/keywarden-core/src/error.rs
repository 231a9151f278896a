// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keywarden credential vault.

use thiserror::Error;

/// The primary error type used across all Keywarden crates.
///
/// Every variant is a distinct, typed outcome so callers can tell bad input
/// apart from data corruption and from a wrong key. None of these are
/// retried automatically: cryptographic failures are not transient.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Missing or malformed required input fields. Surfaced to the caller verbatim.
    #[error("validation error: {0}")]
    Validation(String),

    /// Record absent, or owned by a different owner. The two cases are
    /// deliberately indistinguishable so callers cannot probe for the
    /// existence of another owner's records.
    #[error("record not found")]
    NotFound,

    /// Stored ciphertext does not match the expected `iv:tag:ciphertext`
    /// shape. Treated as data corruption and surfaced, never discarded.
    #[error("malformed encrypted blob: {0}")]
    MalformedBlob(String),

    /// AEAD tag verification failed. Intentionally does not reveal whether
    /// the key or the ciphertext was at fault.
    #[error("decryption failed")]
    Authentication,

    /// Empty or otherwise unusable owner secret. Fatal for the current request.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Password generator invoked with an unsatisfiable request
    /// (no character classes enabled, zero length).
    #[error("invalid generator options: {0}")]
    InvalidOptions(String),

    /// Persistence collaborator errors (connection, query, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_does_not_leak_detail() {
        let err = VaultError::NotFound;
        assert_eq!(err.to_string(), "record not found");
    }

    #[test]
    fn authentication_failure_is_generic() {
        // The message must not say whether the key or the data was wrong.
        let err = VaultError::Authentication;
        assert_eq!(err.to_string(), "decryption failed");
    }

    #[test]
    fn storage_errors_carry_their_source() {
        let err = VaultError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(err.to_string().contains("disk gone"));
    }
}
