/*!
 * Repository layer for database operations.
 *
 * This module provides the SQLite implementation of the record store,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

use super::connection::DatabaseConnection;
use super::models::{
    ExportHistory, ImportHistory, LocalizationRecord, format_timestamp, parse_timestamp,
};
use crate::app_config::DatabaseConfig;
use crate::localization::store::{InsertOutcome, RecordStore};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Create a repository for the configured location
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        match &config.path {
            _ if config.is_in_memory() => Self::new_in_memory(),
            Some(path) => Ok(Self::new(DatabaseConnection::new(path)?)),
            None => Self::new_default(),
        }
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Row helpers
    // =========================================================================

    fn record_from_row(row: &rusqlite::Row) -> rusqlite::Result<LocalizationRecord> {
        Ok(LocalizationRecord {
            id: row.get(0)?,
            key: row.get(1)?,
            localization_culture: row.get(2)?,
            resource_key: row.get(3)?,
            text: row.get(4)?,
            updated_timestamp: Self::timestamp_column(row, 5)?,
        })
    }

    fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let value: String = row.get(idx)?;
        parse_timestamp(&value).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
        })
    }

    fn find_text_sync(
        conn: &Connection,
        key: &str,
        culture: &str,
        resource_key: &str,
    ) -> Result<Option<Option<String>>> {
        let mut stmt = conn.prepare_cached(
            r#"
            SELECT text FROM localization_records
            WHERE key = ?1 AND localization_culture = ?2 AND resource_key = ?3
            "#,
        )?;

        let text = stmt
            .query_row(params![key, culture, resource_key], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;

        Ok(text)
    }

    fn insert_sync(conn: &Connection, record: &LocalizationRecord) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO localization_records (
                key, localization_culture, resource_key, text, updated_timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.key,
                record.localization_culture,
                record.resource_key,
                record.text,
                format_timestamp(&Utc::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn append_import_history(conn: &Connection, information: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO import_history (imported, information) VALUES (?1, ?2)",
            params![format_timestamp(&Utc::now()), information],
        )?;
        Ok(())
    }

    fn append_export_history(conn: &Connection, reason: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO export_history (exported, reason) VALUES (?1, ?2)",
            params![format_timestamp(&Utc::now()), reason],
        )?;
        Ok(())
    }

    fn is_unique_violation(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl RecordStore for Repository {
    fn load_all_for_resource(&self, resource_key: &str) -> Result<HashMap<String, String>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare_cached(
                r#"
                SELECT key, localization_culture, text
                FROM localization_records
                WHERE resource_key = ?1 AND text IS NOT NULL
                "#,
            )?;

            let rows = stmt.query_map([resource_key], |row| {
                let key: String = row.get(0)?;
                let culture: String = row.get(1)?;
                let text: String = row.get(2)?;
                Ok((crate::localization::cache::cache_key(&key, &culture), text))
            })?;

            let entries = rows
                .collect::<rusqlite::Result<HashMap<_, _>>>()
                .with_context(|| format!("Failed to load records for resource '{}'", resource_key))?;

            debug!("Loaded {} records for resource '{}'", entries.len(), resource_key);
            Ok(entries)
        })
    }

    fn exists(&self, key: &str, culture: &str, resource_key: &str) -> Result<bool> {
        self.find_text(key, culture, resource_key)
            .map(|found| found.is_some())
    }

    fn find_text(
        &self,
        key: &str,
        culture: &str,
        resource_key: &str,
    ) -> Result<Option<Option<String>>> {
        self.db
            .execute(|conn| Self::find_text_sync(conn, key, culture, resource_key))
    }

    fn insert(&self, record: &LocalizationRecord) -> Result<i64> {
        self.db.execute(|conn| {
            let id = Self::insert_sync(conn, record)
                .with_context(|| format!("Failed to insert record {}", record))?;
            Ok(id)
        })
    }

    fn insert_if_absent(&self, record: &LocalizationRecord) -> Result<InsertOutcome> {
        self.db.transaction(|tx| {
            let (key, culture, resource) = (
                record.key.as_str(),
                record.localization_culture.as_str(),
                record.resource_key.as_str(),
            );

            if let Some(text) = Self::find_text_sync(tx, key, culture, resource)? {
                debug!("Record {} already exists, skipping insert", record);
                return Ok(InsertOutcome::Existing(text));
            }

            match Self::insert_sync(tx, record) {
                Ok(id) => {
                    info!("Created localization record {} (id {})", record, id);
                    Ok(InsertOutcome::Inserted(id))
                }
                // Another writer on the same database file got there first
                Err(e) if Self::is_unique_violation(&e) => {
                    let text = Self::find_text_sync(tx, key, culture, resource)?.flatten();
                    Ok(InsertOutcome::Existing(text))
                }
                Err(e) => Err(e).with_context(|| format!("Failed to insert record {}", record)),
            }
        })
    }

    fn insert_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize> {
        self.db.transaction(|tx| {
            for record in records {
                Self::insert_sync(tx, record)
                    .with_context(|| format!("Failed to import record {}", record))?;
            }
            Self::append_import_history(tx, information)?;

            info!("Imported {} new records ({})", records.len(), information);
            Ok(records.len())
        })
    }

    fn update_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize> {
        self.db.transaction(|tx| {
            let now = format_timestamp(&Utc::now());
            let mut updated = 0;

            for record in records {
                let changed = tx
                    .execute(
                        r#"
                        UPDATE localization_records
                        SET text = ?1, updated_timestamp = ?2
                        WHERE key = ?3 AND localization_culture = ?4 AND resource_key = ?5
                        "#,
                        params![
                            record.text,
                            now,
                            record.key,
                            record.localization_culture,
                            record.resource_key,
                        ],
                    )
                    .with_context(|| format!("Failed to update record {}", record))?;

                if changed == 0 {
                    warn!("Skipping update of unknown record {}", record);
                }
                updated += changed;
            }
            Self::append_import_history(tx, information)?;

            info!("Updated {} of {} records ({})", updated, records.len(), information);
            Ok(updated)
        })
    }

    fn query_updated_since(
        &self,
        since: DateTime<Utc>,
        culture: Option<&str>,
        reason: &str,
    ) -> Result<Vec<LocalizationRecord>> {
        self.db.transaction(|tx| {
            Self::append_export_history(tx, reason)?;

            let mut stmt = tx.prepare(
                r#"
                SELECT id, key, localization_culture, resource_key, text, updated_timestamp
                FROM localization_records
                WHERE updated_timestamp > ?1
                  AND (?2 IS NULL OR localization_culture = ?2)
                ORDER BY id
                "#,
            )?;

            let records = stmt
                .query_map(params![format_timestamp(&since), culture], Self::record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            info!("Exported {} records updated since {} ({})", records.len(), since, reason);
            Ok(records)
        })
    }

    fn query_all(&self, reason: &str) -> Result<Vec<LocalizationRecord>> {
        self.db.transaction(|tx| {
            Self::append_export_history(tx, reason)?;

            let mut stmt = tx.prepare(
                r#"
                SELECT id, key, localization_culture, resource_key, text, updated_timestamp
                FROM localization_records
                ORDER BY id
                "#,
            )?;

            let records = stmt
                .query_map([], Self::record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            info!("Exported all {} records ({})", records.len(), reason);
            Ok(records)
        })
    }

    fn import_history(&self) -> Result<Vec<ImportHistory>> {
        self.db.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, imported, information FROM import_history ORDER BY id")?;

            let entries = stmt
                .query_map([], |row| {
                    Ok(ImportHistory {
                        id: row.get(0)?,
                        imported: Self::timestamp_column(row, 1)?,
                        information: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(entries)
        })
    }

    fn export_history(&self) -> Result<Vec<ExportHistory>> {
        self.db.execute(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, exported, reason FROM export_history ORDER BY id")?;

            let entries = stmt
                .query_map([], |row| {
                    Ok(ExportHistory {
                        id: row.get(0)?,
                        exported: Self::timestamp_column(row, 1)?,
                        reason: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(entries)
        })
    }

    fn detach_all_tracked_entities(&self) -> Result<()> {
        self.db.execute(|conn| {
            conn.flush_prepared_statement_cache();
            debug!("Flushed prepared statement cache");
            Ok(())
        })
    }
}
