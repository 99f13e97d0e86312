/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One translated string, unique per (key, culture, resource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationRecord {
    /// Database ID (0 until assigned by the store)
    #[serde(default)]
    pub id: i64,
    /// Lookup key
    pub key: String,
    /// Culture name, e.g. "de-CH"
    pub localization_culture: String,
    /// Owning resource
    pub resource_key: String,
    /// Localized text
    pub text: Option<String>,
    /// Last modification time, maintained by the store
    #[serde(default = "Utc::now")]
    pub updated_timestamp: DateTime<Utc>,
}

impl LocalizationRecord {
    /// Create a new, not yet persisted record
    pub fn new(
        key: impl Into<String>,
        localization_culture: impl Into<String>,
        resource_key: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            id: 0, // Will be assigned by database
            key: key.into(),
            localization_culture: localization_culture.into(),
            resource_key: resource_key.into(),
            text,
            updated_timestamp: Utc::now(),
        }
    }

    /// Cache key of this record within its resource
    pub fn cache_key(&self) -> String {
        crate::localization::cache::cache_key(&self.key, &self.localization_culture)
    }
}

impl fmt::Display for LocalizationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.resource_key, self.key, self.localization_culture
        )
    }
}

/// Audit entry appended by every bulk import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportHistory {
    pub id: i64,
    pub imported: DateTime<Utc>,
    pub information: Option<String>,
}

/// Audit entry appended by every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHistory {
    pub id: i64,
    pub exported: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Format a timestamp for storage
///
/// Fixed-width RFC 3339 in UTC, so text order matches time order.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid stored timestamp: {}", value))?;
    Ok(parsed.with_timezone(&Utc))
}
