//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use docvault_core::{DocumentId, DocumentRecord, Identity};
use docvault_perms::AccessGrant;

use crate::error::{Result, StoreError};
use crate::traits::{check_next_id, DocumentTable, InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Shared id counter.
    counter: u64,

    /// Document registry records.
    primary: BTreeMap<DocumentId, DocumentRecord>,

    /// Records written by the alternate registration path.
    secondary: BTreeMap<DocumentId, DocumentRecord>,

    /// Grants keyed by (document, grantee).
    grants: BTreeMap<(DocumentId, Identity), AccessGrant>,
}

impl MemoryStoreInner {
    fn table(&self, table: DocumentTable) -> &BTreeMap<DocumentId, DocumentRecord> {
        match table {
            DocumentTable::Primary => &self.primary,
            DocumentTable::Secondary => &self.secondary,
        }
    }

    fn table_mut(&mut self, table: DocumentTable) -> &mut BTreeMap<DocumentId, DocumentRecord> {
        match table {
            DocumentTable::Primary => &mut self.primary,
            DocumentTable::Secondary => &mut self.secondary,
        }
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn document_counter(&self) -> Result<u64> {
        Ok(self.read()?.counter)
    }

    async fn insert_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<InsertResult> {
        let mut inner = self.write()?;

        check_next_id(inner.counter, record)?;

        if inner.table(table).contains_key(&record.id) {
            return Ok(InsertResult::AlreadyExists);
        }

        inner.table_mut(table).insert(record.id, record.clone());
        inner.counter = record.id.get();

        Ok(InsertResult::Inserted)
    }

    async fn replace_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<()> {
        let mut inner = self.write()?;

        match inner.table_mut(table).get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "{} document {}",
                table, record.id
            ))),
        }
    }

    async fn get_document(
        &self,
        table: DocumentTable,
        id: DocumentId,
    ) -> Result<Option<DocumentRecord>> {
        Ok(self.read()?.table(table).get(&id).cloned())
    }

    async fn document_ids(&self, table: DocumentTable) -> Result<Vec<DocumentId>> {
        Ok(self.read()?.table(table).keys().copied().collect())
    }

    async fn put_grant(&self, grant: &AccessGrant) -> Result<Option<AccessGrant>> {
        let mut inner = self.write()?;
        Ok(inner.grants.insert(grant.key(), grant.clone()))
    }

    async fn get_grant(
        &self,
        document_id: DocumentId,
        grantee: &Identity,
    ) -> Result<Option<AccessGrant>> {
        Ok(self.read()?.grants.get(&(document_id, *grantee)).cloned())
    }

    async fn grants_for_document(&self, document_id: DocumentId) -> Result<Vec<AccessGrant>> {
        let inner = self.read()?;
        let lo = (document_id, Identity::from_bytes([0x00; 32]));
        let hi = (document_id, Identity::from_bytes([0xff; 32]));
        Ok(inner
            .grants
            .range(lo..=hi)
            .map(|(_, grant)| grant.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::NewDocument;
    use docvault_perms::GrantRequest;

    const OWNER: Identity = Identity::from_bytes([1; 32]);

    fn make_record(id: u64) -> DocumentRecord {
        NewDocument::new(
            format!("doc {}", id),
            "a".repeat(64),
            "descriptor",
            "general",
            ["tag"],
        )
        .into_record(DocumentId(id), OWNER, 100)
    }

    fn make_grant(doc: u64, grantee: u8, permission: &str, now: u64) -> AccessGrant {
        let request = GrantRequest::new(Identity::from_bytes([grantee; 32]), permission, 10, false);
        AccessGrant::issue(DocumentId(doc), &OWNER, &request, now).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert_eq!(store.document_counter().await.unwrap(), 0);

        let record = make_record(1);
        let result = store
            .insert_document(DocumentTable::Primary, &record)
            .await
            .unwrap();
        assert_eq!(result, InsertResult::Inserted);
        assert_eq!(store.document_counter().await.unwrap(), 1);

        let retrieved = store
            .get_document(DocumentTable::Primary, DocumentId(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved, record);
    }

    #[tokio::test]
    async fn test_tables_are_disjoint_but_share_counter() {
        let store = MemoryStore::new();
        store
            .insert_document(DocumentTable::Primary, &make_record(1))
            .await
            .unwrap();
        store
            .insert_document(DocumentTable::Secondary, &make_record(2))
            .await
            .unwrap();

        assert_eq!(store.document_counter().await.unwrap(), 2);
        assert_eq!(
            store.document_ids(DocumentTable::Primary).await.unwrap(),
            vec![DocumentId(1)]
        );
        assert_eq!(
            store.document_ids(DocumentTable::Secondary).await.unwrap(),
            vec![DocumentId(2)]
        );
    }

    #[tokio::test]
    async fn test_counter_mismatch_writes_nothing() {
        let store = MemoryStore::new();
        let err = store
            .insert_document(DocumentTable::Primary, &make_record(5))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CounterMismatch { expected: 1, got: 5 }));
        assert_eq!(store.document_counter().await.unwrap(), 0);
        assert!(store.document_ids(DocumentTable::Primary).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .replace_document(DocumentTable::Primary, &make_record(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_grant_overwrites() {
        let store = MemoryStore::new();
        let first = make_grant(1, 2, "view", 10);
        let second = make_grant(1, 2, "full", 20);

        assert_eq!(store.put_grant(&first).await.unwrap(), None);
        assert_eq!(store.put_grant(&second).await.unwrap(), Some(first));

        let stored = store
            .get_grant(DocumentId(1), &Identity::from_bytes([2; 32]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_grants_for_document() {
        let store = MemoryStore::new();
        store.put_grant(&make_grant(1, 3, "view", 0)).await.unwrap();
        store.put_grant(&make_grant(1, 2, "edit", 0)).await.unwrap();
        store.put_grant(&make_grant(2, 2, "full", 0)).await.unwrap();

        let grants = store.grants_for_document(DocumentId(1)).await.unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].grantee, Identity::from_bytes([2; 32]));
        assert_eq!(grants[1].grantee, Identity::from_bytes([3; 32]));
    }
}
