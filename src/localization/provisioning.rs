/*!
 * Auto-provisioning of missing records.
 *
 * When a lookup misses and auto-creation is enabled, the gate writes a
 * placeholder record for the (key, culture, resource) triple. The existence
 * check and the insert run as one store operation, so concurrent misses for
 * the same triple produce a single row.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::culture::{SupportedCultures, parse_culture};
use crate::database::models::LocalizationRecord;
use crate::errors::LocalizationError;
use crate::localization::store::{InsertOutcome, RecordStore};

/// Why the gate did not provide a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The culture is not in the supported set
    UnsupportedCulture,
    /// The record exists but its text is NULL
    ExistingWithoutText,
}

/// Outcome of a provisioning attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A new record was written with this text
    Created(String),
    /// A concurrent caller created the record first; carries its text
    AlreadyExists(String),
    /// Nothing to return; the caller applies its fallback policy
    Declined(DeclineReason),
}

/// Guards creation of new records on lookup misses
#[derive(Clone)]
pub struct AutoProvisioningGate {
    store: Arc<dyn RecordStore>,
    supported_cultures: Arc<SupportedCultures>,
    append_culture: bool,
}

impl AutoProvisioningGate {
    pub fn new(
        store: Arc<dyn RecordStore>,
        supported_cultures: Arc<SupportedCultures>,
        append_culture: bool,
    ) -> Self {
        Self {
            store,
            supported_cultures,
            append_culture,
        }
    }

    /// Text written for a new record
    pub fn placeholder_text(&self, key: &str, culture: &str) -> String {
        if self.append_culture {
            format!("{}.{}", key, culture)
        } else {
            key.to_string()
        }
    }

    /// Try to create the record for a missed lookup
    ///
    /// The record is written under the canonical culture name, so differently
    /// spelled cultures share one row. Store failures propagate; nothing is
    /// inserted in that case.
    pub fn try_provision(
        &self,
        key: &str,
        culture: &str,
        resource_key: &str,
    ) -> Result<ProvisionOutcome, LocalizationError> {
        let canonical = match parse_culture(culture) {
            Ok(canonical) => canonical,
            Err(e) => {
                warn!("Not provisioning '{}' for malformed culture: {:#}", key, e);
                return Ok(ProvisionOutcome::Declined(DeclineReason::UnsupportedCulture));
            }
        };

        if !self.supported_cultures.contains(&canonical) {
            debug!("Not provisioning '{}' for unsupported culture '{}'", key, canonical);
            return Ok(ProvisionOutcome::Declined(DeclineReason::UnsupportedCulture));
        }

        let text = self.placeholder_text(key, &canonical);
        let record = LocalizationRecord::new(key, canonical.as_str(), resource_key, Some(text.clone()));

        let outcome = match self.store.insert_if_absent(&record)? {
            InsertOutcome::Inserted(_) => ProvisionOutcome::Created(text),
            InsertOutcome::Existing(Some(existing)) => ProvisionOutcome::AlreadyExists(existing),
            InsertOutcome::Existing(None) => {
                ProvisionOutcome::Declined(DeclineReason::ExistingWithoutText)
            }
        };

        Ok(outcome)
    }
}
