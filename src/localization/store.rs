/*!
 * Record store contract.
 *
 * The localization layer only talks to persistence through this trait.
 * Implementations serialize every operation on their store session, so
 * each method is atomic with respect to the others.
 */

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::database::models::{ExportHistory, ImportHistory, LocalizationRecord};

/// Result of an insert guarded by the unique (key, culture, resource) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this id
    Inserted(i64),
    /// The triple already existed; carries the stored text
    Existing(Option<String>),
}

/// Common trait for localization record stores
pub trait RecordStore: Send + Sync {
    /// All texts of a resource, keyed by `"{key}.{culture}"`
    ///
    /// Records whose text is NULL are left out.
    fn load_all_for_resource(&self, resource_key: &str) -> Result<HashMap<String, String>>;

    /// Whether a record exists for the triple
    fn exists(&self, key: &str, culture: &str, resource_key: &str) -> Result<bool>;

    /// Text of the record for the triple; `None` when there is no record
    fn find_text(&self, key: &str, culture: &str, resource_key: &str)
        -> Result<Option<Option<String>>>;

    /// Insert one record, returning its id
    fn insert(&self, record: &LocalizationRecord) -> Result<i64>;

    /// Check for the triple and insert only when absent, as one operation
    fn insert_if_absent(&self, record: &LocalizationRecord) -> Result<InsertOutcome>;

    /// Insert records and append an import history entry, all or nothing
    fn insert_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize>;

    /// Update records by triple and append an import history entry, all or nothing
    ///
    /// Returns the number of records that matched an existing row.
    fn update_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize>;

    /// Records updated strictly after `since`, optionally for one culture;
    /// appends an export history entry
    fn query_updated_since(
        &self,
        since: DateTime<Utc>,
        culture: Option<&str>,
        reason: &str,
    ) -> Result<Vec<LocalizationRecord>>;

    /// Every record; appends an export history entry
    fn query_all(&self, reason: &str) -> Result<Vec<LocalizationRecord>>;

    /// Import audit trail, oldest first
    fn import_history(&self) -> Result<Vec<ImportHistory>>;

    /// Export audit trail, oldest first
    fn export_history(&self) -> Result<Vec<ExportHistory>>;

    /// Drop any state the store session keeps between operations
    fn detach_all_tracked_entities(&self) -> Result<()>;
}
