// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`RecordStore`] trait.
//!
//! Filter criteria are pushed down to SQL so listing stays index-friendly;
//! the predicates mirror `RecordFilter::matches` exactly.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use keywarden_core::types::{OwnerId, RecordData, RecordFilter, RecordId, VaultRecord};
use keywarden_core::{RecordStore, VaultError};

use crate::database::{Database, map_tr_err};

const RECORD_COLUMNS: &str = "id, owner, site, site_url, username, email, category, tags, \
     password_blob, notes_blob, strength, compromised, last_changed, age_days, \
     last_used, times_used, is_favorite, has_2fa, two_factor_type, created_at, updated_at";

/// SQLite-backed record store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, id: &RecordId) -> Result<Option<VaultRecord>, VaultError> {
        let id = id.0.clone();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM vault_records WHERE id = ?1"
                ))?;
                let result = stmt.query_row(params![id], row_to_record);
                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_row_err)
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
        let row_id = id.0.clone();
        let data = data.clone();

        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tags = serde_json::to_string(&data.tags)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                conn.execute(
                    "INSERT OR REPLACE INTO vault_records
                       (id, owner, site, site_url, username, email, category, tags,
                        password_blob, notes_blob, strength, compromised, last_changed,
                        age_days, last_used, times_used, is_favorite, has_2fa,
                        two_factor_type, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                             ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
                    params![
                        row_id,
                        data.owner.0,
                        data.site,
                        data.site_url,
                        data.username,
                        data.email,
                        data.category.to_string(),
                        tags,
                        data.password_blob.to_string(),
                        data.notes_blob.as_ref().map(|b| b.to_string()),
                        data.strength.to_string(),
                        data.compromised,
                        fmt_ts(data.last_changed),
                        data.age_days,
                        data.last_used.map(fmt_ts),
                        data.times_used,
                        data.is_favorite,
                        data.has_2fa,
                        data.two_factor_type.to_string(),
                        fmt_ts(data.created_at),
                        fmt_ts(data.updated_at),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        debug!(id = %id, "vault record persisted");
        Ok(id)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, VaultError> {
        let id = id.0.clone();
        let affected = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM vault_records WHERE id = ?1", params![id])
            })
            .await
            .map_err(map_tr_err)?;
        Ok(affected > 0)
    }

    async fn query_by_owner(
        &self,
        owner: &OwnerId,
        filter: &RecordFilter,
    ) -> Result<Vec<VaultRecord>, VaultError> {
        let owner = owner.0.clone();
        let filter = filter.clone();

        self.db
            .connection()
            .call(move |conn| {
                let mut sql = format!(
                    "SELECT {RECORD_COLUMNS} FROM vault_records WHERE owner = ?1"
                );
                let mut args: Vec<Value> = vec![Value::Text(owner)];

                if let Some(category) = filter.category {
                    args.push(Value::Text(category.to_string()));
                    sql.push_str(&format!(" AND category = ?{}", args.len()));
                }
                if filter.favorites_only {
                    sql.push_str(" AND is_favorite = 1");
                }
                if filter.weak_only {
                    sql.push_str(" AND strength IN ('weak', 'medium')");
                }
                if let Some(days) = filter.older_than_days {
                    args.push(Value::Integer(days));
                    sql.push_str(&format!(" AND age_days >= ?{}", args.len()));
                }
                if let Some(query) = &filter.search {
                    // Tags are a JSON array; a substring match over the
                    // serialized text matches each tag's content.
                    let pattern = format!("%{}%", query.to_lowercase());
                    args.push(Value::Text(pattern));
                    let n = args.len();
                    sql.push_str(&format!(
                        " AND (lower(site) LIKE ?{n} OR lower(username) LIKE ?{n} \
                           OR lower(coalesce(email, '')) LIKE ?{n} OR lower(tags) LIKE ?{n})"
                    ));
                }

                sql.push_str(" ORDER BY site COLLATE NOCASE ASC, id ASC");

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(args), row_to_record)?;
                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await
            .map_err(map_row_err)
    }
}

/// Error mapping for row-reading paths. A corrupt stored blob must surface
/// as [`VaultError::MalformedBlob`], not be buried inside the storage
/// variant, so callers can tell data corruption from a database fault.
fn map_row_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VaultError {
    if let tokio_rusqlite::Error::Error(rusqlite::Error::FromSqlConversionFailure(_, _, source)) =
        &e
        && let Some(VaultError::MalformedBlob(msg)) = source.downcast_ref::<VaultError>()
    {
        return VaultError::MalformedBlob(msg.clone());
    }
    map_tr_err(e)
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(idx: usize, text: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_enum<T: std::str::FromStr>(idx: usize, text: String) -> Result<T, rusqlite::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_record(row: &Row<'_>) -> Result<VaultRecord, rusqlite::Error> {
    let tags: String = row.get(7)?;
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    let password_blob: String = row.get(8)?;
    let password_blob = password_blob
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
    let notes_blob: Option<String> = row.get(9)?;
    let notes_blob = notes_blob
        .map(|s| s.parse())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(VaultRecord {
        id: RecordId(row.get(0)?),
        data: RecordData {
            owner: OwnerId(row.get(1)?),
            site: row.get(2)?,
            site_url: row.get(3)?,
            username: row.get(4)?,
            email: row.get(5)?,
            category: parse_enum(6, row.get(6)?)?,
            tags,
            password_blob,
            notes_blob,
            strength: parse_enum(10, row.get(10)?)?,
            compromised: row.get(11)?,
            last_changed: parse_ts(12, row.get(12)?)?,
            age_days: row.get(13)?,
            last_used: row.get::<_, Option<String>>(14)?.map_or(Ok(None), |s| {
                parse_ts(14, s).map(Some)
            })?,
            times_used: row.get(15)?,
            is_favorite: row.get(16)?,
            has_2fa: row.get(17)?,
            two_factor_type: parse_enum(18, row.get(18)?)?,
            created_at: parse_ts(19, row.get(19)?)?,
            updated_at: parse_ts(20, row.get(20)?)?,
        },
    })
}
