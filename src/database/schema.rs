/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for the localization record table,
 * the import/export history tables, and the schema version check.
 */

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use log::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
///
/// A database written by a newer schema version is rejected.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    match get_schema_version(conn)? {
        0 => {
            info!("Initializing database schema v{}", SCHEMA_VERSION);
            create_all_tables(conn)?;
            set_schema_version(conn, SCHEMA_VERSION)?;
        }
        SCHEMA_VERSION => {
            debug!("Database schema is up to date (v{})", SCHEMA_VERSION);
        }
        other => {
            return Err(anyhow!(
                "Unsupported schema version v{} (expected v{})",
                other,
                SCHEMA_VERSION
            ));
        }
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers of other processes off the writer's back
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // AUTOINCREMENT: ids are monotonic and never reused
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS localization_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,
            localization_culture TEXT NOT NULL,
            resource_key TEXT NOT NULL,
            text TEXT,
            updated_timestamp TEXT NOT NULL,
            UNIQUE(key, localization_culture, resource_key)
        );

        CREATE INDEX IF NOT EXISTS idx_records_resource ON localization_records(resource_key);
        CREATE INDEX IF NOT EXISTS idx_records_updated ON localization_records(updated_timestamp);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS import_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            imported TEXT NOT NULL,
            information TEXT
        );

        CREATE TABLE IF NOT EXISTS export_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exported TEXT NOT NULL,
            reason TEXT
        );
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
