// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record lifecycle orchestration: create, read, update, delete, list,
//! stats, import/export.
//!
//! Records move `nonexistent -> sealed -> sealed (updated) -> deleted`;
//! there is no plaintext-at-rest state. Every operation derives the working
//! key from the owner secret on entry, seals or opens blobs through the
//! cipher module, and talks to the persistence collaborator last, so an
//! abandoned request never leaves a half-written record behind.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use keywarden_config::model::VaultConfig;
use keywarden_core::types::{OwnerId, RecordData, RecordFilter, RecordId, VaultRecord};
use keywarden_core::{EncryptedBlob, OwnerSecretProvider, RecordStore, Strength, VaultError};

use crate::kdf::{self, DerivedKey};
use crate::record::{
    ExportedRecord, FullRecordView, GenerateRequest, GenerateResponse, ImportError, ImportReport,
    NewRecordInput, RecordPatch, RecordView, SecurityStats,
};
use crate::{cipher, generate, strength};

/// The vault service, wired against a record store and an owner-secret
/// capability.
///
/// Holds no key material between operations; keys are derived per call and
/// zeroed on drop.
pub struct VaultService {
    store: Arc<dyn RecordStore>,
    secrets: Arc<dyn OwnerSecretProvider>,
    config: VaultConfig,
}

impl fmt::Debug for VaultService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultService")
            .field("secrets", &"[REDACTED]")
            .field("config", &self.config)
            .finish()
    }
}

impl VaultService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        secrets: Arc<dyn OwnerSecretProvider>,
        config: VaultConfig,
    ) -> Self {
        Self {
            store,
            secrets,
            config,
        }
    }

    /// Derive the owner's working key for the current operation.
    fn owner_key(&self, owner: &OwnerId) -> Result<DerivedKey, VaultError> {
        let secret = self.secrets.secret_for(owner)?;
        kdf::derive_key(
            secret.expose_secret(),
            &self.config.kdf_salt,
            self.config.kdf_log_n,
            self.config.kdf_r,
            self.config.kdf_p,
        )
    }

    /// Load a record and enforce ownership. Absent and foreign-owned records
    /// are both `NotFound`.
    async fn load_owned(&self, owner: &OwnerId, id: &RecordId) -> Result<VaultRecord, VaultError> {
        match self.store.get(id).await? {
            Some(record) if record.data.owner == *owner => Ok(record),
            _ => Err(VaultError::NotFound),
        }
    }

    /// Create a new sealed record. Returns a sanitized view; the plaintext
    /// never leaves this call.
    pub async fn create(
        &self,
        owner: &OwnerId,
        input: NewRecordInput,
    ) -> Result<RecordView, VaultError> {
        if input.site.trim().is_empty()
            || input.username.trim().is_empty()
            || input.password.is_empty()
        {
            return Err(VaultError::Validation(
                "site, username, and password are required".to_string(),
            ));
        }

        let key = self.owner_key(owner)?;
        let now = Utc::now();
        let data = seal_new_record(owner, &input, &key, now)?;

        let id = self.store.put(None, &data).await?;
        info!(owner = %owner, id = %id, "vault record created");

        Ok(RecordView::from_record(&VaultRecord { id, data }, now))
    }

    /// Read a record's metadata. Never decrypts.
    pub async fn get_display(
        &self,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<RecordView, VaultError> {
        let record = self.load_owned(owner, id).await?;
        Ok(RecordView::from_record(&record, Utc::now()))
    }

    /// Read a record with its decrypted secret, for a single use.
    ///
    /// Usage counters are only persisted after a successful decrypt, so a
    /// corrupt record is reported without side effects. Cipher failures
    /// (`Authentication`, `MalformedBlob`) propagate unchanged.
    pub async fn get_for_use(
        &self,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<FullRecordView, VaultError> {
        let mut record = self.load_owned(owner, id).await?;
        let key = self.owner_key(owner)?;

        let password = open_utf8(&record.data.password_blob, &key)?;
        let notes = record
            .data
            .notes_blob
            .as_ref()
            .map(|blob| open_utf8(blob, &key))
            .transpose()?;

        let now = Utc::now();
        record.data.times_used += 1;
        record.data.last_used = Some(now);
        record.data.updated_at = now;
        record.data.refresh_age(now);
        self.store.put(Some(&record.id), &record.data).await?;
        debug!(owner = %owner, id = %record.id, "vault record opened for use");

        Ok(FullRecordView {
            record: RecordView::from_record(&record, now),
            password,
            notes,
        })
    }

    /// Apply a partial update. A new password reseals under a fresh IV and
    /// bumps `last_changed`; description-only patches leave the blob alone.
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: &RecordId,
        patch: RecordPatch,
    ) -> Result<RecordView, VaultError> {
        let mut record = self.load_owned(owner, id).await?;
        let data = &mut record.data;
        let now = Utc::now();

        if let Some(site) = patch.site {
            if site.trim().is_empty() {
                return Err(VaultError::Validation("site must not be empty".to_string()));
            }
            data.site = site;
        }
        if let Some(username) = patch.username {
            if username.trim().is_empty() {
                return Err(VaultError::Validation(
                    "username must not be empty".to_string(),
                ));
            }
            data.username = username;
        }
        // Empty strings clear the optional descriptive fields.
        if let Some(site_url) = patch.site_url {
            data.site_url = (!site_url.is_empty()).then_some(site_url);
        }
        if let Some(email) = patch.email {
            data.email = (!email.is_empty()).then_some(email);
        }
        if let Some(category) = patch.category {
            data.category = category;
        }
        if let Some(tags) = patch.tags {
            data.tags = tags;
        }
        if let Some(compromised) = patch.compromised {
            data.compromised = compromised;
        }
        if let Some(is_favorite) = patch.is_favorite {
            data.is_favorite = is_favorite;
        }
        if let Some(has_2fa) = patch.has_2fa {
            data.has_2fa = has_2fa;
        }
        if let Some(two_factor_type) = patch.two_factor_type {
            data.two_factor_type = two_factor_type;
        }

        if patch.password.is_some() || patch.notes.is_some() {
            let key = self.owner_key(owner)?;

            if let Some(password) = patch.password {
                if password.is_empty() {
                    return Err(VaultError::Validation(
                        "password must not be empty".to_string(),
                    ));
                }
                data.strength = strength::score(&password);
                data.password_blob = cipher::seal(password.as_bytes(), &key)?;
                data.last_changed = now;
            }

            // Tri-state: absent = keep, empty = clear, value = reseal.
            if let Some(notes) = patch.notes {
                data.notes_blob = if notes.is_empty() {
                    None
                } else {
                    Some(cipher::seal(notes.as_bytes(), &key)?)
                };
            }
        }

        data.updated_at = now;
        data.refresh_age(now);
        self.store.put(Some(&record.id), &record.data).await?;
        debug!(owner = %owner, id = %record.id, "vault record updated");

        Ok(RecordView::from_record(&record, now))
    }

    /// Delete a record. Deliberately idempotent: deleting an id that is
    /// already gone succeeds. A foreign owner's record stays `NotFound`.
    pub async fn delete(&self, owner: &OwnerId, id: &RecordId) -> Result<(), VaultError> {
        match self.store.get(id).await? {
            None => Ok(()),
            Some(record) if record.data.owner != *owner => Err(VaultError::NotFound),
            Some(_) => {
                self.store.delete(id).await?;
                info!(owner = %owner, id = %id, "vault record deleted");
                Ok(())
            }
        }
    }

    /// Flip the favorite flag; returns the new value.
    pub async fn toggle_favorite(
        &self,
        owner: &OwnerId,
        id: &RecordId,
    ) -> Result<bool, VaultError> {
        let mut record = self.load_owned(owner, id).await?;
        record.data.is_favorite = !record.data.is_favorite;
        record.data.updated_at = Utc::now();
        self.store.put(Some(&record.id), &record.data).await?;
        Ok(record.data.is_favorite)
    }

    /// Sanitized views of the owner's records matching every supplied
    /// filter criterion.
    pub async fn list(
        &self,
        owner: &OwnerId,
        filter: &RecordFilter,
    ) -> Result<Vec<RecordView>, VaultError> {
        let now = Utc::now();
        let records = self.store.query_by_owner(owner, filter).await?;
        Ok(records
            .iter()
            .map(|record| RecordView::from_record(record, now))
            .collect())
    }

    /// Aggregate security posture across all of the owner's records.
    ///
    /// Staleness is computed lazily from `last_changed` at read time; there
    /// is no background expiry job.
    pub async fn security_stats(&self, owner: &OwnerId) -> Result<SecurityStats, VaultError> {
        let now = Utc::now();
        let records = self
            .store
            .query_by_owner(owner, &RecordFilter::default())
            .await?;

        let mut stats = SecurityStats {
            total: records.len() as u64,
            weak: 0,
            compromised: 0,
            old: 0,
            without_2fa: 0,
            with_2fa: 0,
            by_category: Default::default(),
            by_strength: Default::default(),
            security_score: 100,
        };

        for record in &records {
            let data = &record.data;
            if data.strength <= Strength::Medium {
                stats.weak += 1;
            }
            if data.compromised {
                stats.compromised += 1;
            }
            if data.age_in_days(now) >= self.config.stale_after_days {
                stats.old += 1;
            }
            if data.has_2fa {
                stats.with_2fa += 1;
            } else {
                stats.without_2fa += 1;
            }
            *stats
                .by_category
                .entry(data.category.to_string())
                .or_insert(0) += 1;
            *stats
                .by_strength
                .entry(data.strength.to_string())
                .or_insert(0) += 1;
        }

        stats.security_score = composite_score(&stats);
        Ok(stats)
    }

    /// Decrypt every record for backup. The caller is responsible for
    /// protecting the result.
    pub async fn export(&self, owner: &OwnerId) -> Result<Vec<ExportedRecord>, VaultError> {
        let key = self.owner_key(owner)?;
        let records = self
            .store
            .query_by_owner(owner, &RecordFilter::default())
            .await?;

        let mut exported = Vec::with_capacity(records.len());
        for record in &records {
            let data = &record.data;
            exported.push(ExportedRecord {
                site: data.site.clone(),
                site_url: data.site_url.clone(),
                username: data.username.clone(),
                email: data.email.clone(),
                password: open_utf8(&data.password_blob, &key)?,
                notes: data
                    .notes_blob
                    .as_ref()
                    .map(|blob| open_utf8(blob, &key))
                    .transpose()?,
                category: Some(data.category),
                tags: data.tags.clone(),
            });
        }
        info!(owner = %owner, count = exported.len(), "vault export produced");
        Ok(exported)
    }

    /// Bulk-create records. Entries failing validation are collected in the
    /// report and skipped; the rest are imported.
    pub async fn import(
        &self,
        owner: &OwnerId,
        entries: Vec<ExportedRecord>,
    ) -> Result<ImportReport, VaultError> {
        if entries.is_empty() {
            return Err(VaultError::Validation(
                "no entries provided for import".to_string(),
            ));
        }

        let key = self.owner_key(owner)?;
        let mut report = ImportReport {
            imported: 0,
            errors: Vec::new(),
        };

        for (index, entry) in entries.into_iter().enumerate() {
            if entry.site.trim().is_empty()
                || entry.username.trim().is_empty()
                || entry.password.is_empty()
            {
                report.errors.push(ImportError {
                    index,
                    message: "site, username, and password are required".to_string(),
                });
                continue;
            }

            let input = NewRecordInput {
                site: entry.site,
                site_url: entry.site_url,
                username: entry.username,
                email: entry.email,
                password: entry.password,
                notes: entry.notes,
                category: entry.category,
                tags: entry.tags,
                has_2fa: false,
                two_factor_type: None,
            };
            let data = seal_new_record(owner, &input, &key, Utc::now())?;
            self.store.put(None, &data).await?;
            report.imported += 1;
        }

        info!(
            owner = %owner,
            imported = report.imported,
            rejected = report.errors.len(),
            "vault import finished"
        );
        Ok(report)
    }

    /// Generate a password and score it. Pure; nothing is stored.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, VaultError> {
        let password = generate::generate(request.length, &request.options)?;
        let strength = strength::score(&password);
        let length = password.chars().count();
        Ok(GenerateResponse {
            password,
            strength,
            length,
        })
    }
}

/// Seal a validated input into a fresh `RecordData`. Empty notes are treated
/// as absent.
fn seal_new_record(
    owner: &OwnerId,
    input: &NewRecordInput,
    key: &DerivedKey,
    now: DateTime<Utc>,
) -> Result<RecordData, VaultError> {
    let password_blob = cipher::seal(input.password.as_bytes(), key)?;
    let notes_blob = input
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
        .map(|notes| cipher::seal(notes.as_bytes(), key))
        .transpose()?;

    Ok(RecordData {
        owner: owner.clone(),
        site: input.site.clone(),
        site_url: input.site_url.clone(),
        username: input.username.clone(),
        email: input.email.clone(),
        category: input.category.unwrap_or_default(),
        tags: input.tags.clone(),
        password_blob,
        notes_blob,
        strength: strength::score(&input.password),
        compromised: false,
        last_changed: now,
        age_days: 0,
        last_used: None,
        times_used: 0,
        is_favorite: false,
        has_2fa: input.has_2fa,
        two_factor_type: input.two_factor_type.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    })
}

/// Open a blob and require UTF-8 plaintext.
fn open_utf8(blob: &EncryptedBlob, key: &DerivedKey) -> Result<String, VaultError> {
    let plaintext = cipher::open(blob, key)?;
    String::from_utf8(plaintext)
        .map_err(|_| VaultError::Internal("decrypted value is not valid UTF-8".to_string()))
}

/// Composite 0-100 score: start at 100 and subtract weighted penalty
/// fractions for weak, compromised, stale, and no-2FA records.
fn composite_score(stats: &SecurityStats) -> u8 {
    let mut score = 100.0_f64;
    if stats.total > 0 {
        let total = stats.total as f64;
        score -= stats.weak as f64 / total * 30.0;
        score -= stats.compromised as f64 / total * 40.0;
        score -= stats.old as f64 / total * 20.0;
        score -= stats.without_2fa as f64 / total * 10.0;
    }
    score.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u64, weak: u64, compromised: u64, old: u64, without_2fa: u64) -> SecurityStats {
        SecurityStats {
            total,
            weak,
            compromised,
            old,
            without_2fa,
            with_2fa: total - without_2fa,
            by_category: Default::default(),
            by_strength: Default::default(),
            security_score: 0,
        }
    }

    #[test]
    fn empty_vault_scores_perfect() {
        assert_eq!(composite_score(&stats(0, 0, 0, 0, 0)), 100);
    }

    #[test]
    fn all_penalties_together_floor_at_zero() {
        assert_eq!(composite_score(&stats(4, 4, 4, 4, 4)), 0);
    }

    #[test]
    fn fractional_penalties_round_to_nearest() {
        // 100 - 30/3 = 90.
        assert_eq!(composite_score(&stats(3, 1, 0, 0, 0)), 90);
        // 100 - 30/2 - 10/2 = 80.
        assert_eq!(composite_score(&stats(2, 1, 0, 0, 1)), 80);
        // 100 - 40*(2/3) = 73.33 -> 73.
        assert_eq!(composite_score(&stats(3, 0, 2, 0, 0)), 73);
    }
}
