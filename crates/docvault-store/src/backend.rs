//! Backend selection.
//!
//! [`StoreConfig`] names a backend; [`AnyStore`] is the opened backend,
//! dispatching every [`Store`] call to whichever implementation it holds.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docvault_core::{DocumentId, DocumentRecord, Identity};
use docvault_perms::AccessGrant;

use crate::error::Result;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::traits::{DocumentTable, InsertResult, Store};

/// Which storage backend to open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Ephemeral in-memory maps.
    #[default]
    Memory,
    /// A SQLite database file, created and migrated on open.
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Open the configured backend.
    pub fn open(&self) -> Result<AnyStore> {
        match self {
            StoreConfig::Memory => Ok(AnyStore::Memory(MemoryStore::new())),
            StoreConfig::Sqlite { path } => {
                tracing::debug!(path = %path.display(), "opening sqlite store");
                Ok(AnyStore::Sqlite(SqliteStore::open(path)?))
            }
        }
    }
}

/// An opened store of either kind.
pub enum AnyStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl AnyStore {
    fn inner(&self) -> &dyn Store {
        match self {
            AnyStore::Memory(store) => store,
            AnyStore::Sqlite(store) => store,
        }
    }
}

#[async_trait]
impl Store for AnyStore {
    async fn document_counter(&self) -> Result<u64> {
        self.inner().document_counter().await
    }

    async fn insert_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<InsertResult> {
        self.inner().insert_document(table, record).await
    }

    async fn replace_document(
        &self,
        table: DocumentTable,
        record: &DocumentRecord,
    ) -> Result<()> {
        self.inner().replace_document(table, record).await
    }

    async fn get_document(
        &self,
        table: DocumentTable,
        id: DocumentId,
    ) -> Result<Option<DocumentRecord>> {
        self.inner().get_document(table, id).await
    }

    async fn document_ids(&self, table: DocumentTable) -> Result<Vec<DocumentId>> {
        self.inner().document_ids(table).await
    }

    async fn put_grant(&self, grant: &AccessGrant) -> Result<Option<AccessGrant>> {
        self.inner().put_grant(grant).await
    }

    async fn get_grant(
        &self,
        document_id: DocumentId,
        grantee: &Identity,
    ) -> Result<Option<AccessGrant>> {
        self.inner().get_grant(document_id, grantee).await
    }

    async fn grants_for_document(&self, document_id: DocumentId) -> Result<Vec<AccessGrant>> {
        self.inner().grants_for_document(document_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json() {
        let config: StoreConfig = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(config, StoreConfig::Memory);

        let config: StoreConfig =
            serde_json::from_str(r#"{"backend":"sqlite","path":"/tmp/docvault.db"}"#).unwrap();
        assert_eq!(
            config,
            StoreConfig::Sqlite {
                path: PathBuf::from("/tmp/docvault.db")
            }
        );
    }

    #[tokio::test]
    async fn test_open_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let configs = [
            StoreConfig::Memory,
            StoreConfig::Sqlite {
                path: dir.path().join("any.db"),
            },
        ];

        for config in configs {
            let store = config.open().unwrap();
            assert_eq!(store.document_counter().await.unwrap(), 0);
            assert!(store
                .document_ids(DocumentTable::Primary)
                .await
                .unwrap()
                .is_empty());
        }
    }
}
