/*!
 * String localizer and lookup resolution.
 *
 * A `StringLocalizer` is bound to one resource cache. Each lookup either
 * hits the cache or falls back: auto-provisioning when enabled, otherwise
 * the bare key or a `resource.key.culture` placeholder.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

use crate::culture::{current_culture, parse_culture};
use crate::errors::{LocalizationError, UnsupportedOperation};
use crate::localization::cache::{ResourceCache, cache_key};
use crate::localization::provisioning::{AutoProvisioningGate, ProvisionOutcome};

/// Result of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    /// The requested key
    pub name: String,
    /// Translation or fallback text
    pub value: String,
    /// Set whenever `value` is not a pre-existing translation
    pub resource_not_found: bool,
}

impl LocalizedString {
    /// Whether the value came from an existing translation
    pub fn succeeded(&self) -> bool {
        !self.resource_not_found
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// What to do when a lookup misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallbackPolicy {
    /// Provision a record for the missing triple
    pub auto_create: bool,
    /// Return the bare key instead of the diagnostic placeholder
    pub return_key_on_not_found: bool,
}

/// Localizer for one resource
#[derive(Clone)]
pub struct StringLocalizer {
    resource_key: String,
    cache: Arc<ResourceCache>,
    gate: AutoProvisioningGate,
    policy: FallbackPolicy,
    default_culture: Arc<str>,
}

impl StringLocalizer {
    pub(crate) fn new(
        cache: Arc<ResourceCache>,
        gate: AutoProvisioningGate,
        policy: FallbackPolicy,
        default_culture: Arc<str>,
    ) -> Self {
        Self {
            resource_key: cache.resource_key().to_string(),
            cache,
            gate,
            policy,
            default_culture,
        }
    }

    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// The cache this localizer reads from
    pub fn cache(&self) -> &Arc<ResourceCache> {
        &self.cache
    }

    /// Look up `name` in the ambient culture of the current thread
    pub fn get(&self, name: &str) -> Result<LocalizedString, LocalizationError> {
        match current_culture() {
            Some(culture) => self.get_with_culture(name, &culture),
            None => self.get_with_culture(name, &self.default_culture),
        }
    }

    /// Look up `name` in exactly `culture`, without parent-culture fallback
    ///
    /// Well-formed culture names are matched in canonical form, so `de-ch`
    /// and `de_CH` resolve like `de-CH`.
    pub fn get_with_culture(
        &self,
        name: &str,
        culture: &str,
    ) -> Result<LocalizedString, LocalizationError> {
        let culture = parse_culture(culture).unwrap_or_else(|_| culture.to_string());
        let (value, succeeded) = self.resolve_text(name, &culture)?;

        Ok(LocalizedString {
            name: name.to_string(),
            value,
            resource_not_found: !succeeded,
        })
    }

    /// Look up `name` in the ambient culture and substitute `{0}`, `{1}`, ... with `args`
    pub fn get_formatted(
        &self,
        name: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<LocalizedString, LocalizationError> {
        let mut localized = self.get(name)?;
        localized.value = format_placeholders(&localized.value, args);
        Ok(localized)
    }

    /// Formatted lookup in exactly `culture`
    pub fn get_formatted_with_culture(
        &self,
        name: &str,
        culture: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<LocalizedString, LocalizationError> {
        let mut localized = self.get_with_culture(name, culture)?;
        localized.value = format_placeholders(&localized.value, args);
        Ok(localized)
    }

    /// Enumerating strings is not offered by the database localizer
    pub fn all_strings(
        &self,
        _include_parent_cultures: bool,
    ) -> Result<Vec<LocalizedString>, UnsupportedOperation> {
        Err(UnsupportedOperation::AllStrings)
    }

    /// Culture-bound localizers are not offered; use `get_with_culture`
    pub fn with_culture(&self, _culture: &str) -> Result<StringLocalizer, UnsupportedOperation> {
        Err(UnsupportedOperation::WithCulture)
    }

    /// Resolve a key to `(text, succeeded)`
    fn resolve_text(
        &self,
        key: &str,
        culture: &str,
    ) -> Result<(String, bool), LocalizationError> {
        if let Some(text) = self.cache.lookup(key, culture) {
            return Ok((text, true));
        }

        if self.policy.auto_create {
            match self.gate.try_provision(key, culture, &self.resource_key)? {
                ProvisionOutcome::Created(text) | ProvisionOutcome::AlreadyExists(text) => {
                    self.cache.put(key, culture, &text);
                    return Ok((text, false));
                }
                ProvisionOutcome::Declined(reason) => {
                    debug!(
                        "Provisioning of '{}' declined ({:?}), applying fallback",
                        key, reason
                    );
                }
            }
        }

        if self.policy.return_key_on_not_found {
            return Ok((key.to_string(), false));
        }

        Ok((format!("{}.{}", self.resource_key, cache_key(key, culture)), false))
    }
}

impl fmt::Debug for StringLocalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringLocalizer")
            .field("resource_key", &self.resource_key)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Positional placeholder regex ({0}, {1}, ...)
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Replace positional `{n}` placeholders; unknown indices stay as written
fn format_placeholders(template: &str, args: &[&dyn fmt::Display]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
