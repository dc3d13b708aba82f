//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            tracing::debug!(version, "applying schema migration");
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Document registry and the secondary store share one schema.
        CREATE TABLE documents (
            id INTEGER PRIMARY KEY,           -- allocated from registry_counter
            name TEXT NOT NULL,
            creator BLOB NOT NULL,            -- 32 bytes, opaque identity
            digest TEXT NOT NULL,             -- 64 chars, content fingerprint
            descriptor TEXT NOT NULL,
            classification TEXT NOT NULL,
            tags BLOB NOT NULL,               -- CBOR array of strings
            created_at INTEGER NOT NULL,      -- logical time
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE secondary_documents (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            creator BLOB NOT NULL,
            digest TEXT NOT NULL,
            descriptor TEXT NOT NULL,
            classification TEXT NOT NULL,
            tags BLOB NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Access grants, one per (document, grantee)
        CREATE TABLE access_grants (
            document_id INTEGER NOT NULL,
            grantee BLOB NOT NULL,
            permission_type TEXT NOT NULL,    -- view | edit | full
            granted_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            modification_allowed INTEGER NOT NULL,
            PRIMARY KEY (document_id, grantee)
        );

        -- Shared id counter, single row
        CREATE TABLE registry_counter (
            singleton INTEGER PRIMARY KEY CHECK (singleton = 0),
            value INTEGER NOT NULL
        );
        INSERT INTO registry_counter (singleton, value) VALUES (0, 0);

        CREATE INDEX idx_documents_creator ON documents(creator);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
