/*!
 * Database module for persistent storage of localization records.
 *
 * This module provides SQLite-based persistence for:
 * - Localization records, unique per (key, culture, resource)
 * - Import and export audit history
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{ExportHistory, ImportHistory, LocalizationRecord};
pub use repository::Repository;
