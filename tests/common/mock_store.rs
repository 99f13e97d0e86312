/*!
 * Record store doubles for failure scenarios
 */

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use sql_localizer::Repository;
use sql_localizer::database::{ExportHistory, ImportHistory, LocalizationRecord};
use sql_localizer::localization::{InsertOutcome, RecordStore};

/// Callback run once after a resource load has read its snapshot
type LoadHook = Box<dyn FnOnce() + Send>;

/// Wraps a repository and fails every operation while switched off
pub struct FlakyStore {
    inner: Repository,
    failing: AtomicBool,
    load_hook: Mutex<Option<LoadHook>>,
}

impl FlakyStore {
    pub fn new(inner: Repository) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            load_hook: Mutex::new(None),
        }
    }

    /// Run `hook` after the next resource load has read the store
    pub fn on_next_load(&self, hook: impl FnOnce() + Send + 'static) {
        *self.load_hook.lock() = Some(Box::new(hook));
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &Repository {
        &self.inner
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(anyhow!("database unavailable"))
        } else {
            Ok(())
        }
    }
}

impl RecordStore for FlakyStore {
    fn load_all_for_resource(&self, resource_key: &str) -> Result<HashMap<String, String>> {
        self.check()?;
        let entries = self.inner.load_all_for_resource(resource_key)?;

        let hook = self.load_hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }

        Ok(entries)
    }

    fn exists(&self, key: &str, culture: &str, resource_key: &str) -> Result<bool> {
        self.check()?;
        self.inner.exists(key, culture, resource_key)
    }

    fn find_text(
        &self,
        key: &str,
        culture: &str,
        resource_key: &str,
    ) -> Result<Option<Option<String>>> {
        self.check()?;
        self.inner.find_text(key, culture, resource_key)
    }

    fn insert(&self, record: &LocalizationRecord) -> Result<i64> {
        self.check()?;
        self.inner.insert(record)
    }

    fn insert_if_absent(&self, record: &LocalizationRecord) -> Result<InsertOutcome> {
        self.check()?;
        self.inner.insert_if_absent(record)
    }

    fn insert_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize> {
        self.check()?;
        self.inner.insert_many(records, information)
    }

    fn update_many(&self, records: &[LocalizationRecord], information: &str) -> Result<usize> {
        self.check()?;
        self.inner.update_many(records, information)
    }

    fn query_updated_since(
        &self,
        since: DateTime<Utc>,
        culture: Option<&str>,
        reason: &str,
    ) -> Result<Vec<LocalizationRecord>> {
        self.check()?;
        self.inner.query_updated_since(since, culture, reason)
    }

    fn query_all(&self, reason: &str) -> Result<Vec<LocalizationRecord>> {
        self.check()?;
        self.inner.query_all(reason)
    }

    fn import_history(&self) -> Result<Vec<ImportHistory>> {
        self.check()?;
        self.inner.import_history()
    }

    fn export_history(&self) -> Result<Vec<ExportHistory>> {
        self.check()?;
        self.inner.export_history()
    }

    fn detach_all_tracked_entities(&self) -> Result<()> {
        self.check()?;
        self.inner.detach_all_tracked_entities()
    }
}
