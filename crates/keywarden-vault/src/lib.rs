// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential vault engine: key derivation, sealed record storage, password
//! tooling, and the [`VaultService`] lifecycle orchestrator.

pub mod cipher;
pub mod generate;
pub mod kdf;
pub mod record;
pub mod service;
pub mod strength;

pub use generate::GeneratorOptions;
pub use record::{
    ExportedRecord, FullRecordView, GenerateRequest, GenerateResponse, ImportReport,
    NewRecordInput, RecordPatch, RecordView, SecurityStats,
};
pub use service::VaultService;
