/*!
 * # sql-localizer - database-backed string localization
 *
 * Resolves a (key, culture, resource) triple to localized text stored in a
 * relational table, caching every resource in memory.
 *
 * ## Features
 *
 * - One lock-free cache per resource, loaded on first use
 * - Three resource identification modes: short name, full name, global bucket
 * - Fallbacks for missing texts: bare key, diagnostic placeholder, or
 *   auto-provisioned record (development mode)
 * - Exactly one auto-provisioned record per triple under concurrent misses
 * - Explicit cache reset, targeted cache updates, bulk import and export
 *   with audit history
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `culture`: Culture validation and the ambient culture scope
 * - `database`: SQLite persistence of records and history
 * - `localization`: Caches, registry, provisioning and localizers:
 *   - `localization::registry`: Cache directory and localizer factory
 *   - `localization::cache`: Per-resource cache
 *   - `localization::provisioning`: Auto-provisioning gate
 *   - `localization::localizer`: Lookup resolution
 *   - `localization::bulk`: Import and export
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod culture;
pub mod database;
pub mod errors;
pub mod localization;

// Re-export main types for easier usage
pub use app_config::Config;
pub use culture::{CultureScope, current_culture};
pub use database::{LocalizationRecord, Repository};
pub use errors::{LocalizationError, UnsupportedOperation};
pub use localization::{CacheRegistry, LocalizedString, ResourceSource, StringLocalizer};
