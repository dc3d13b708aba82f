//! Ownership checks.
//!
//! Only a document's creator may modify it or grant access to it. The
//! secondary store is never consulted here.

use docvault_core::{DocumentId, DocumentRecord, Identity};
use docvault_store::{DocumentTable, Store, StoreError};

use crate::error::{RegistryError, Result};

/// Ownership checks against the document registry.
pub struct AuthorizationGuard<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> AuthorizationGuard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// True iff the document exists and `identity` created it.
    ///
    /// An absent document yields `false`, not an error. Callers that must
    /// tell "not found" apart from "not owner" use [`Self::load_owned`].
    pub async fn is_owner(
        &self,
        document_id: DocumentId,
        identity: &Identity,
    ) -> std::result::Result<bool, StoreError> {
        Ok(self
            .store
            .get_document(DocumentTable::Primary, document_id)
            .await?
            .is_some_and(|record| record.is_created_by(identity)))
    }

    /// Load a document for mutation by `caller`.
    ///
    /// Fails with `DocumentNotFound` first, then `NotAuthorized`.
    pub async fn load_owned(
        &self,
        document_id: DocumentId,
        caller: &Identity,
    ) -> Result<DocumentRecord> {
        let record = self
            .store
            .get_document(DocumentTable::Primary, document_id)
            .await?
            .ok_or(RegistryError::DocumentNotFound(document_id))?;

        ensure_owner(&record, caller)?;
        Ok(record)
    }
}

/// Fail with `NotAuthorized` unless `caller` created `record`.
pub fn ensure_owner(record: &DocumentRecord, caller: &Identity) -> Result<()> {
    if !record.is_created_by(caller) {
        return Err(RegistryError::NotAuthorized {
            document_id: record.id,
            caller: *caller,
        });
    }
    Ok(())
}
