// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Keywarden workspace.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::VaultError;

/// Opaque identifier for a record owner, foreign to the external identity system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Unique identifier for a vault record, assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of site categories.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Social,
    Banking,
    Email,
    Shopping,
    Work,
    Entertainment,
    Utilities,
    #[default]
    Other,
}

/// Password strength bucket. Variants are declared weakest-first so the
/// derived ordering matches the scoring scale.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

/// Second-factor descriptor for the stored credential's upstream account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TwoFactorType {
    #[default]
    None,
    App,
    Sms,
    Email,
    Hardware,
}

/// IV length in bytes for sealed blobs.
pub const IV_LEN: usize = 16;
/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// An authenticated ciphertext, only meaningful together with the owner's
/// derived key.
///
/// The canonical stored form is three colon-separated hex segments in the
/// fixed order `iv:auth_tag:ciphertext`. Anything else is a
/// [`VaultError::MalformedBlob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub iv: Vec<u8>,
    pub auth_tag: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(&self.iv),
            hex::encode(&self.auth_tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedBlob {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [iv_hex, tag_hex, ct_hex] = parts.as_slice() else {
            return Err(VaultError::MalformedBlob(format!(
                "expected 3 colon-separated segments, got {}",
                parts.len()
            )));
        };

        let iv = hex::decode(iv_hex)
            .map_err(|_| VaultError::MalformedBlob("iv segment is not valid hex".to_string()))?;
        let auth_tag = hex::decode(tag_hex)
            .map_err(|_| VaultError::MalformedBlob("tag segment is not valid hex".to_string()))?;
        let ciphertext = hex::decode(ct_hex).map_err(|_| {
            VaultError::MalformedBlob("ciphertext segment is not valid hex".to_string())
        })?;

        if iv.len() != IV_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "iv must be {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        if auth_tag.len() != TAG_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "auth tag must be {TAG_LEN} bytes, got {}",
                auth_tag.len()
            )));
        }

        Ok(Self {
            iv,
            auth_tag,
            ciphertext,
        })
    }
}

// Blobs serialize as their canonical string form, both in JSON payloads and
// in the SQLite TEXT column.
impl Serialize for EncryptedBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EncryptedBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One stored credential: its id plus everything the store persists.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultRecord {
    pub id: RecordId,
    pub data: RecordData,
}

/// The persisted shape of a credential. The plaintext secret never appears
/// here; only [`EncryptedBlob`]s are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    pub owner: OwnerId,
    pub site: String,
    pub site_url: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub password_blob: EncryptedBlob,
    pub notes_blob: Option<EncryptedBlob>,
    pub strength: Strength,
    pub compromised: bool,
    pub last_changed: DateTime<Utc>,
    /// Materialized copy of the age, refreshed on every write so the store
    /// can filter on it. Views recompute from `last_changed` instead.
    pub age_days: i64,
    pub last_used: Option<DateTime<Utc>>,
    pub times_used: i64,
    pub is_favorite: bool,
    pub has_2fa: bool,
    pub two_factor_type: TwoFactorType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const MS_PER_DAY: i64 = 86_400_000;

impl RecordData {
    /// Days since the secret last changed, rounded up. A derived view, never
    /// an independently mutable counter.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        let ms = (now - self.last_changed).num_milliseconds().max(0);
        // Round up; ms is clamped non-negative above.
        (ms + MS_PER_DAY - 1) / MS_PER_DAY
    }

    /// Refresh the materialized `age_days` copy before a write.
    pub fn refresh_age(&mut self, now: DateTime<Utc>) {
        self.age_days = self.age_in_days(now);
    }
}

/// Filter for owner-scoped record queries. All supplied criteria combine
/// with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub category: Option<Category>,
    pub favorites_only: bool,
    /// "Weak" deliberately includes `medium`: both buckets count as
    /// passwords needing attention.
    pub weak_only: bool,
    pub older_than_days: Option<i64>,
    /// Case-insensitive substring match against site, username, email, and tags.
    pub search: Option<String>,
}

impl RecordFilter {
    /// Whether a record satisfies every supplied criterion. The SQLite store
    /// pushes the same predicates down to SQL; this is the reference
    /// semantics used by the in-memory store and by tests.
    pub fn matches(&self, data: &RecordData) -> bool {
        if let Some(category) = self.category
            && data.category != category
        {
            return false;
        }
        if self.favorites_only && !data.is_favorite {
            return false;
        }
        if self.weak_only && data.strength > Strength::Medium {
            return false;
        }
        if let Some(days) = self.older_than_days
            && data.age_days < days
        {
            return false;
        }
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            let hit = data.site.to_lowercase().contains(&query)
                || data.username.to_lowercase().contains(&query)
                || data
                    .email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&query))
                || data.tags.iter().any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blob() -> EncryptedBlob {
        EncryptedBlob {
            iv: vec![0xab; IV_LEN],
            auth_tag: vec![0xcd; TAG_LEN],
            ciphertext: vec![0x01, 0x02, 0x03],
        }
    }

    fn sample_data() -> RecordData {
        RecordData {
            owner: OwnerId("owner-1".to_string()),
            site: "GitHub".to_string(),
            site_url: Some("https://github.com".to_string()),
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            category: Category::Work,
            tags: vec!["dev".to_string(), "Code".to_string()],
            password_blob: sample_blob(),
            notes_blob: None,
            strength: Strength::Strong,
            compromised: false,
            last_changed: "2026-01-01T00:00:00Z".parse().unwrap(),
            age_days: 0,
            last_used: None,
            times_used: 0,
            is_favorite: false,
            has_2fa: false,
            two_factor_type: TwoFactorType::None,
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2026-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn blob_roundtrips_through_string_form() {
        let blob = sample_blob();
        let s = blob.to_string();
        let parsed: EncryptedBlob = s.parse().unwrap();
        assert_eq!(parsed, blob);
    }

    #[test]
    fn blob_with_wrong_segment_count_is_malformed() {
        let err = "abcd:ef01".parse::<EncryptedBlob>().unwrap_err();
        assert!(matches!(err, VaultError::MalformedBlob(_)));
    }

    #[test]
    fn blob_with_bad_hex_is_malformed() {
        let iv = hex::encode([0u8; IV_LEN]);
        let tag = hex::encode([0u8; TAG_LEN]);
        let err = format!("{iv}:{tag}:zz").parse::<EncryptedBlob>().unwrap_err();
        assert!(matches!(err, VaultError::MalformedBlob(_)));
    }

    #[test]
    fn blob_with_short_iv_is_malformed() {
        let iv = hex::encode([0u8; 12]);
        let tag = hex::encode([0u8; TAG_LEN]);
        let err = format!("{iv}:{tag}:00").parse::<EncryptedBlob>().unwrap_err();
        assert!(matches!(err, VaultError::MalformedBlob(_)));
    }

    #[test]
    fn blob_with_truncated_tag_is_malformed() {
        let iv = hex::encode([0u8; IV_LEN]);
        let tag = hex::encode([0u8; 8]);
        let err = format!("{iv}:{tag}:00").parse::<EncryptedBlob>().unwrap_err();
        assert!(matches!(err, VaultError::MalformedBlob(_)));
    }

    #[test]
    fn strength_ordering_matches_scale() {
        assert!(Strength::Weak < Strength::Medium);
        assert!(Strength::Medium < Strength::Strong);
        assert!(Strength::Strong < Strength::VeryStrong);
    }

    #[test]
    fn enums_use_kebab_case_wire_names() {
        assert_eq!(Strength::VeryStrong.to_string(), "very-strong");
        assert_eq!(Category::Banking.to_string(), "banking");
        assert_eq!(TwoFactorType::Hardware.to_string(), "hardware");
        assert_eq!(
            serde_json::to_string(&Strength::VeryStrong).unwrap(),
            "\"very-strong\""
        );
        let parsed: Category = "shopping".parse().unwrap();
        assert_eq!(parsed, Category::Shopping);
    }

    #[test]
    fn age_is_computed_from_last_changed() {
        let data = sample_data();
        let now: DateTime<Utc> = "2026-01-11T00:00:00Z".parse().unwrap();
        assert_eq!(data.age_in_days(now), 10);
        // Partial days round up.
        let now: DateTime<Utc> = "2026-01-11T00:00:01Z".parse().unwrap();
        assert_eq!(data.age_in_days(now), 11);
        // Clock skew never yields a negative age.
        let past: DateTime<Utc> = "2025-12-31T00:00:00Z".parse().unwrap();
        assert_eq!(data.age_in_days(past), 0);
    }

    #[test]
    fn filter_criteria_combine_with_and() {
        let mut data = sample_data();
        data.is_favorite = true;
        data.strength = Strength::Medium;

        let filter = RecordFilter {
            category: Some(Category::Work),
            favorites_only: true,
            weak_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&data));

        let mut wrong_category = filter.clone();
        wrong_category.category = Some(Category::Banking);
        assert!(!wrong_category.matches(&data));

        data.strength = Strength::Strong;
        assert!(!filter.matches(&data));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let data = sample_data();
        for query in ["github", "ALICE", "example.com", "code"] {
            let filter = RecordFilter {
                search: Some(query.to_string()),
                ..Default::default()
            };
            assert!(filter.matches(&data), "query {query:?} should match");
        }
        let miss = RecordFilter {
            search: Some("netflix".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&data));
    }

    #[test]
    fn older_than_uses_materialized_age() {
        let mut data = sample_data();
        data.age_days = 120;
        let filter = RecordFilter {
            older_than_days: Some(90),
            ..Default::default()
        };
        assert!(filter.matches(&data));
        data.age_days = 89;
        assert!(!filter.matches(&data));
    }
}
