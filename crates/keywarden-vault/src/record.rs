// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response shapes for vault operations.
//!
//! The sanitized [`RecordView`] is the only record representation most
//! callers ever see; the plaintext secret appears solely in
//! [`FullRecordView`], returned from a single read-for-use.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keywarden_core::types::{Category, RecordId, Strength, TwoFactorType, VaultRecord};

use crate::generate::GeneratorOptions;

/// Input for creating a record. Site, username, and password are required;
/// everything else defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRecordInput {
    pub site: String,
    #[serde(default)]
    pub site_url: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub has_2fa: bool,
    #[serde(default)]
    pub two_factor_type: Option<TwoFactorType>,
}

/// Partial update for a record. `None` fields are left untouched.
///
/// `notes` is tri-state: absent keeps the existing notes, an empty string
/// clears them, and any other value reseals them under a fresh IV. A new
/// `password` always replaces the stored blob wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub compromised: Option<bool>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub has_2fa: Option<bool>,
    #[serde(default)]
    pub two_factor_type: Option<TwoFactorType>,
}

/// Sanitized record view: all metadata, no secret material.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub id: RecordId,
    pub site: String,
    pub site_url: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub strength: Strength,
    pub compromised: bool,
    pub last_changed: DateTime<Utc>,
    /// Recomputed from `last_changed` on every load.
    pub age_days: i64,
    pub last_used: Option<DateTime<Utc>>,
    pub times_used: i64,
    pub is_favorite: bool,
    pub has_2fa: bool,
    pub two_factor_type: TwoFactorType,
    pub has_notes: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordView {
    pub fn from_record(record: &VaultRecord, now: DateTime<Utc>) -> Self {
        let data = &record.data;
        Self {
            id: record.id.clone(),
            site: data.site.clone(),
            site_url: data.site_url.clone(),
            username: data.username.clone(),
            email: data.email.clone(),
            category: data.category,
            tags: data.tags.clone(),
            strength: data.strength,
            compromised: data.compromised,
            last_changed: data.last_changed,
            age_days: data.age_in_days(now),
            last_used: data.last_used,
            times_used: data.times_used,
            is_favorite: data.is_favorite,
            has_2fa: data.has_2fa,
            two_factor_type: data.two_factor_type,
            has_notes: data.notes_blob.is_some(),
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }
}

/// Sanitized view plus the decrypted secret. Only produced by read-for-use.
#[derive(Debug, Clone, Serialize)]
pub struct FullRecordView {
    #[serde(flatten)]
    pub record: RecordView,
    pub password: String,
    pub notes: Option<String>,
}

/// A password generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub length: usize,
    #[serde(flatten)]
    pub options: GeneratorOptions,
}

/// A generated password with its computed strength.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub password: String,
    pub strength: Strength,
    pub length: usize,
}

/// One decrypted record in a backup export; also the accepted import shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedRecord {
    pub site: String,
    #[serde(default)]
    pub site_url: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Outcome of a bulk import: per-entry failures are collected, not fatal.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// A single rejected import entry.
#[derive(Debug, Clone, Serialize)]
pub struct ImportError {
    pub index: usize,
    pub message: String,
}

/// Aggregated security posture for one owner's records.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityStats {
    pub total: u64,
    /// Records scoring weak or medium.
    pub weak: u64,
    pub compromised: u64,
    /// Records older than the configured staleness threshold.
    pub old: u64,
    pub without_2fa: u64,
    pub with_2fa: u64,
    pub by_category: BTreeMap<String, u64>,
    pub by_strength: BTreeMap<String, u64>,
    /// Composite 0-100 score; 100 is a clean bill of health.
    pub security_score: u8,
}
