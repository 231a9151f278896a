// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`RecordStore`] for tests and ephemeral use.
//!
//! Shares `RecordFilter::matches` with the domain layer, so it is the
//! reference behavior the SQLite pushdown is checked against.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use keywarden_core::types::{OwnerId, RecordData, RecordFilter, RecordId, VaultRecord};
use keywarden_core::{RecordStore, VaultError};

/// Map-backed store. Cloning shares the underlying records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, RecordData>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, across all owners.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, id: &RecordId) -> Result<Option<VaultRecord>, VaultError> {
        let records = self.records.read().await;
        Ok(records.get(&id.0).map(|data| VaultRecord {
            id: id.clone(),
            data: data.clone(),
        }))
    }

    async fn put(
        &self,
        id: Option<&RecordId>,
        data: &RecordData,
    ) -> Result<RecordId, VaultError> {
        let id = match id {
            Some(id) => id.clone(),
            None => RecordId(Uuid::new_v4().to_string()),
        };
        self.records.write().await.insert(id.0.clone(), data.clone());
        Ok(id)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, VaultError> {
        Ok(self.records.write().await.remove(&id.0).is_some())
    }

    async fn query_by_owner(
        &self,
        owner: &OwnerId,
        filter: &RecordFilter,
    ) -> Result<Vec<VaultRecord>, VaultError> {
        let records = self.records.read().await;
        let mut matched: Vec<VaultRecord> = records
            .iter()
            .filter(|(_, data)| data.owner == *owner && filter.matches(data))
            .map(|(id, data)| VaultRecord {
                id: RecordId(id.clone()),
                data: data.clone(),
            })
            .collect();
        matched.sort_by(|a, b| {
            a.data
                .site
                .to_lowercase()
                .cmp(&b.data.site.to_lowercase())
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(matched)
    }
}
