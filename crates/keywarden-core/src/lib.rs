// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keywarden credential vault.
//!
//! This crate provides the error taxonomy, the shared domain types (records,
//! encrypted blobs, strength buckets), and the collaborator traits that the
//! vault service is wired against. The crypto itself lives in
//! `keywarden-vault`; persistence backends live in `keywarden-storage`.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use traits::{OwnerSecretProvider, RecordStore};
pub use types::{
    Category, EncryptedBlob, OwnerId, RecordData, RecordFilter, RecordId, Strength, TwoFactorType,
    VaultRecord,
};
