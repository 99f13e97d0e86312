/*!
 * Bulk import and export.
 *
 * Imports write straight to the record store and leave the caches alone;
 * call `reset_all` or `reset_one` afterwards to make the new texts
 * visible. Exports are read-only with respect to the caches. Both record
 * an audit entry in the same store transaction.
 */

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::database::models::{ExportHistory, ImportHistory, LocalizationRecord};
use crate::errors::LocalizationError;
use crate::localization::registry::CacheRegistry;

impl CacheRegistry {
    /// Insert new records and record the import
    pub fn import_new(
        &self,
        records: &[LocalizationRecord],
        information: &str,
    ) -> Result<usize, LocalizationError> {
        Ok(self.store.insert_many(records, information)?)
    }

    /// Update existing records by (key, culture, resource) and record the import
    ///
    /// Returns the number of records that matched.
    pub fn import_update(
        &self,
        records: &[LocalizationRecord],
        information: &str,
    ) -> Result<usize, LocalizationError> {
        Ok(self.store.update_many(records, information)?)
    }

    /// Every record in the store
    pub fn export_all(&self, reason: &str) -> Result<Vec<LocalizationRecord>, LocalizationError> {
        Ok(self.store.query_all(reason)?)
    }

    /// Records updated after `since`, optionally restricted to one culture
    pub fn export_since(
        &self,
        since: DateTime<Utc>,
        culture: Option<&str>,
        reason: &str,
    ) -> Result<Vec<LocalizationRecord>, LocalizationError> {
        Ok(self.store.query_updated_since(since, culture, reason)?)
    }

    pub fn import_history(&self) -> Result<Vec<ImportHistory>, LocalizationError> {
        Ok(self.store.import_history()?)
    }

    pub fn export_history(&self) -> Result<Vec<ExportHistory>, LocalizationError> {
        Ok(self.store.export_history()?)
    }

    // =========================================================================
    // Async wrappers
    // =========================================================================

    /// Run a blocking registry operation on the blocking thread pool
    async fn run_blocking<F, T>(&self, f: F) -> Result<T, LocalizationError>
    where
        F: FnOnce(&CacheRegistry) -> Result<T, LocalizationError> + Send + 'static,
        T: Send + 'static,
    {
        let registry = self.clone();

        tokio::task::spawn_blocking(move || f(&registry))
            .await
            .context("Registry task panicked")?
    }

    /// Async version of `reset_all`
    pub async fn reset_all_async(&self) -> Result<(), LocalizationError> {
        self.run_blocking(|registry| registry.reset_all()).await
    }

    /// Async version of `import_new`
    pub async fn import_new_async(
        &self,
        records: Vec<LocalizationRecord>,
        information: String,
    ) -> Result<usize, LocalizationError> {
        self.run_blocking(move |registry| registry.import_new(&records, &information))
            .await
    }

    /// Async version of `import_update`
    pub async fn import_update_async(
        &self,
        records: Vec<LocalizationRecord>,
        information: String,
    ) -> Result<usize, LocalizationError> {
        self.run_blocking(move |registry| registry.import_update(&records, &information))
            .await
    }

    /// Async version of `export_all`
    pub async fn export_all_async(
        &self,
        reason: String,
    ) -> Result<Vec<LocalizationRecord>, LocalizationError> {
        self.run_blocking(move |registry| registry.export_all(&reason))
            .await
    }

    /// Async version of `export_since`
    pub async fn export_since_async(
        &self,
        since: DateTime<Utc>,
        culture: Option<String>,
        reason: String,
    ) -> Result<Vec<LocalizationRecord>, LocalizationError> {
        self.run_blocking(move |registry| {
            registry.export_since(since, culture.as_deref(), &reason)
        })
        .await
    }
}
