// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The vault core talks to its surroundings through these narrow seams;
//! all use `#[async_trait]` for dynamic dispatch compatibility.

pub mod secret;
pub mod store;

pub use secret::OwnerSecretProvider;
pub use store::RecordStore;
