//! SQLite implementation of the Store trait.
//!
//! This is the persistent storage backend for Docvault. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use docvault_core::{DocumentId, DocumentRecord, Identity};
use docvault_perms::{AccessGrant, PermissionType};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{check_next_id, DocumentTable, InsertResult, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

fn table_name(table: DocumentTable) -> &'static str {
    match table {
        DocumentTable::Primary => "documents",
        DocumentTable::Secondary => "secondary_documents",
    }
}

// SQLite integers are signed; logical values above i64::MAX are refused
// rather than silently wrapped.
fn to_sql_int(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("{} does not fit in SQLite INTEGER", value)))
}

fn column_u64(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn column_identity(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Identity> {
    let bytes: Vec<u8> = row.get(idx)?;
    Identity::try_from(bytes.as_slice())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Blob, Box::new(e)))
}

// Helper to encode tags to CBOR
fn encode_tags(tags: &[String]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(tags, &mut buf).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

const DOCUMENT_COLUMNS: &str =
    "id, name, creator, digest, descriptor, classification, tags, created_at, updated_at";

// Helper to convert a row to DocumentRecord
fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
    let tags_cbor: Vec<u8> = row.get(6)?;
    let tags: Vec<String> = ciborium::from_reader(tags_cbor.as_slice())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Blob, Box::new(e)))?;

    Ok(DocumentRecord {
        id: DocumentId(column_u64(row, 0)?),
        name: row.get(1)?,
        creator: column_identity(row, 2)?,
        digest: row.get(3)?,
        descriptor: row.get(4)?,
        classification: row.get(5)?,
        tags,
        created_at: column_u64(row, 7)?,
        updated_at: column_u64(row, 8)?,
    })
}

const GRANT_COLUMNS: &str =
    "document_id, grantee, permission_type, granted_at, expires_at, modification_allowed";

// Helper to convert a row to AccessGrant
fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccessGrant> {
    let permission: String = row.get(2)?;
    let permission_type: PermissionType = permission
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(AccessGrant {
        document_id: DocumentId(column_u64(row, 0)?),
        grantee: column_identity(row, 1)?,
        permission_type,
        granted_at: column_u64(row, 3)?,
        expires_at: column_u64(row, 4)?,
        modification_allowed: row.get(5)?,
    })
}

fn read_counter(conn: &Connection) -> Result<u64> {
    let value: i64 = conn.query_row(
        "SELECT value FROM registry_counter WHERE singleton = 0",
        [],
        |row| row.get(0),
    )?;
    u64::try_from(value).map_err(|_| StoreError::InvalidData(format!("negative counter {}", value)))
}

fn read_grant(
    conn: &Connection,
    document_id: i64,
    grantee: &[u8],
) -> Result<Option<AccessGrant>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM access_grants WHERE document_id = ?1 AND grantee = ?2",
            GRANT_COLUMNS
        ),
        params![document_id, grantee],
        row_to_grant,
    )
    .optional()
    .map_err(StoreError::from)
}

#[async_trait]
impl Store for SqliteStore {
    async fn document_counter(&self) -> Result<u64> {
        self.with_conn(|conn| read_counter(conn)).await
    }

    async fn insert_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<InsertResult> {
        let record = record.clone();

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            check_next_id(read_counter(&tx)?, &record)?;

            let id = to_sql_int(record.id.get())?;
            let exists: bool = tx.query_row(
                &format!(
                    "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
                    table_name(table)
                ),
                params![id],
                |row| row.get(0),
            )?;

            if exists {
                return Ok(InsertResult::AlreadyExists);
            }

            tx.execute(
                &format!(
                    "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    table_name(table),
                    DOCUMENT_COLUMNS
                ),
                params![
                    id,
                    record.name,
                    record.creator.as_bytes().as_slice(),
                    record.digest,
                    record.descriptor,
                    record.classification,
                    encode_tags(&record.tags)?,
                    to_sql_int(record.created_at)?,
                    to_sql_int(record.updated_at)?,
                ],
            )?;

            tx.execute(
                "UPDATE registry_counter SET value = ?1 WHERE singleton = 0",
                params![id],
            )?;

            tx.commit()?;
            Ok(InsertResult::Inserted)
        })
        .await
    }

    async fn replace_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<()> {
        let record = record.clone();

        self.with_conn(move |conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE {} SET name = ?2, creator = ?3, digest = ?4, descriptor = ?5,
                        classification = ?6, tags = ?7, created_at = ?8, updated_at = ?9
                     WHERE id = ?1",
                    table_name(table)
                ),
                params![
                    to_sql_int(record.id.get())?,
                    record.name,
                    record.creator.as_bytes().as_slice(),
                    record.digest,
                    record.descriptor,
                    record.classification,
                    encode_tags(&record.tags)?,
                    to_sql_int(record.created_at)?,
                    to_sql_int(record.updated_at)?,
                ],
            )?;

            if changed == 0 {
                return Err(StoreError::NotFound(format!(
                    "{} document {}",
                    table, record.id
                )));
            }
            Ok(())
        })
        .await
    }

    async fn get_document(
        &self,
        table: DocumentTable,
        id: DocumentId,
    ) -> Result<Option<DocumentRecord>> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {} FROM {} WHERE id = ?1",
                    DOCUMENT_COLUMNS,
                    table_name(table)
                ),
                params![to_sql_int(id.get())?],
                row_to_document,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn document_ids(&self, table: DocumentTable) -> Result<Vec<DocumentId>> {
        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT id FROM {} ORDER BY id", table_name(table)))?;
            let ids = stmt
                .query_map([], |row| column_u64(row, 0).map(DocumentId))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(ids)
        })
        .await
    }

    async fn put_grant(&self, grant: &AccessGrant) -> Result<Option<AccessGrant>> {
        let grant = grant.clone();

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let document_id = to_sql_int(grant.document_id.get())?;
            let grantee = grant.grantee.as_bytes().as_slice();

            let previous = read_grant(&tx, document_id, grantee)?;

            tx.execute(
                &format!(
                    "INSERT INTO access_grants ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(document_id, grantee) DO UPDATE SET
                        permission_type = excluded.permission_type,
                        granted_at = excluded.granted_at,
                        expires_at = excluded.expires_at,
                        modification_allowed = excluded.modification_allowed",
                    GRANT_COLUMNS
                ),
                params![
                    document_id,
                    grantee,
                    grant.permission_type.as_str(),
                    to_sql_int(grant.granted_at)?,
                    to_sql_int(grant.expires_at)?,
                    grant.modification_allowed,
                ],
            )?;

            tx.commit()?;
            Ok(previous)
        })
        .await
    }

    async fn get_grant(
        &self,
        document_id: DocumentId,
        grantee: &Identity,
    ) -> Result<Option<AccessGrant>> {
        let grantee = *grantee;

        self.with_conn(move |conn| {
            read_grant(conn, to_sql_int(document_id.get())?, grantee.as_bytes().as_slice())
        })
        .await
    }

    async fn grants_for_document(&self, document_id: DocumentId) -> Result<Vec<AccessGrant>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM access_grants WHERE document_id = ?1 ORDER BY grantee",
                GRANT_COLUMNS
            ))?;
            let grants = stmt
                .query_map(params![to_sql_int(document_id.get())?], row_to_grant)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(grants)
        })
        .await
    }
}
