// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence collaborator trait for vault records.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::types::{OwnerId, RecordData, RecordFilter, RecordId, VaultRecord};

/// Key-value collaborator holding vault records.
///
/// The store is not required to understand encryption; it persists records
/// as opaque rows. Implementations must give per-record atomicity: a single
/// `put` either fully applies or not at all. Cross-record consistency is not
/// guaranteed, and concurrent writes to the same record are last-write-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by id. `None` when absent.
    async fn get(&self, id: &RecordId) -> Result<Option<VaultRecord>, VaultError>;

    /// Persist a record. With `id = None` the store assigns a fresh
    /// identifier and inserts; with `Some(id)` the stored row is replaced
    /// wholesale. Returns the record's id either way.
    async fn put(&self, id: Option<&RecordId>, data: &RecordData) -> Result<RecordId, VaultError>;

    /// Remove a record. Returns whether a row was actually deleted.
    async fn delete(&self, id: &RecordId) -> Result<bool, VaultError>;

    /// All of an owner's records satisfying `filter`, ordered by site label
    /// ascending, case-insensitively.
    async fn query_by_owner(
        &self,
        owner: &OwnerId,
        filter: &RecordFilter,
    ) -> Result<Vec<VaultRecord>, VaultError>;
}
