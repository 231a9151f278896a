// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Keywarden credential vault.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and an in-memory store sharing the
//! same [`keywarden_core::RecordStore`] contract for tests.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod store;

pub use database::Database;
pub use memory::MemoryStore;
pub use store::SqliteStore;
