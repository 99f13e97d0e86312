/*!
 * Database-backed string localization.
 *
 * This module provides the lookup path and its administration:
 * - `store`: record store contract implemented by the database layer
 * - `resource`: resource naming and cache key modes
 * - `cache`: per-resource in-memory cache
 * - `provisioning`: auto-creation of records for missed lookups
 * - `registry`: directory of caches and localizer factory
 * - `bulk`: import and export with audit history
 * - `localizer`: per-resource lookup and fallback resolution
 */

pub mod store;
pub mod resource;
pub mod cache;
pub mod provisioning;
pub mod registry;
pub mod bulk;
pub mod localizer;

// Re-export main types
pub use cache::{CacheStats, ResourceCache};
pub use localizer::{FallbackPolicy, LocalizedString, StringLocalizer};
pub use provisioning::{AutoProvisioningGate, DeclineReason, ProvisionOutcome};
pub use registry::CacheRegistry;
pub use resource::{CacheKeyMode, GLOBAL_RESOURCE, Localizable, ResourceSource};
pub use store::{InsertOutcome, RecordStore};
