//! Store trait: the abstract interface for registry persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docvault_core::{DocumentId, DocumentRecord, Identity};
use docvault_perms::AccessGrant;

use crate::error::Result;

/// Which of the two document maps an operation addresses.
///
/// Both maps share one schema and one id counter but never share records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentTable {
    /// The document registry proper. Updates and grants target this map.
    Primary,
    /// The store written by the alternate registration path.
    Secondary,
}

impl DocumentTable {
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentTable::Primary => "primary",
            DocumentTable::Secondary => "secondary",
        }
    }
}

impl fmt::Display for DocumentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of inserting a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Document was inserted and the counter advanced.
    Inserted,
    /// A document with this id already exists in the table. Nothing changed.
    AlreadyExists,
}

/// The Store trait: async interface for registry persistence.
///
/// # Design Notes
///
/// - **One counter**: `document_counter` is shared by both document tables
///   and starts at 0.
/// - **Single mutation point**: only `insert_document` advances the counter,
///   and it writes the record and the counter together.
/// - **Overwrite grants**: `put_grant` replaces any grant under the same
///   `(document, grantee)` key.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Counter
    // ─────────────────────────────────────────────────────────────────────────

    /// Current value of the shared id counter (the last id handed out).
    async fn document_counter(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Document Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new document and set the counter to its id, atomically.
    ///
    /// # Errors
    /// - `CounterMismatch` if `record.id != counter + 1`.
    async fn insert_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<InsertResult>;

    /// Overwrite an existing document. Fails with `NotFound` if absent.
    async fn replace_document(&self, table: DocumentTable, record: &DocumentRecord)
        -> Result<()>;

    /// Get a document by id.
    async fn get_document(
        &self,
        table: DocumentTable,
        id: DocumentId,
    ) -> Result<Option<DocumentRecord>>;

    /// All document ids in a table, ascending.
    async fn document_ids(&self, table: DocumentTable) -> Result<Vec<DocumentId>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a grant, returning the grant it replaced, if any.
    async fn put_grant(&self, grant: &AccessGrant) -> Result<Option<AccessGrant>>;

    /// Get the grant for `(document, grantee)`.
    async fn get_grant(
        &self,
        document_id: DocumentId,
        grantee: &Identity,
    ) -> Result<Option<AccessGrant>>;

    /// All grants on a document, ordered by grantee.
    async fn grants_for_document(&self, document_id: DocumentId) -> Result<Vec<AccessGrant>>;
}

/// Check the id a registration wants to commit against the counter.
pub(crate) fn check_next_id(counter: u64, record: &DocumentRecord) -> Result<()> {
    let expected = counter.wrapping_add(1);
    if counter == u64::MAX || record.id.get() != expected {
        return Err(crate::error::StoreError::CounterMismatch {
            expected,
            got: record.id.get(),
        });
    }
    Ok(())
}
