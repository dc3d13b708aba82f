//! The Registry: the external operations of Docvault.
//!
//! Every operation checks all of its preconditions before writing anything.
//! The first failing check decides the error and nothing is mutated.

use docvault_core::validation::validate_document_update;
use docvault_core::{
    validate_new_document, CallContext, DocumentId, DocumentRecord, DocumentUpdate, Identity,
    NewDocument,
};
use docvault_perms::{AccessGrant, GrantRequest};
use docvault_store::{AnyStore, DocumentTable, InsertResult, Store, StoreError};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::guard::AuthorizationGuard;

/// Whether an update runs the field-format validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldChecks {
    Enforced,
    Skipped,
}

/// The document registry.
///
/// Holds the primary document map, the secondary document map, the grant map
/// and the shared id counter, all behind one [`Store`].
///
/// Timestamps and ids are bounded by the backend: [`docvault_store::SqliteStore`]
/// refuses values above `i64::MAX` with a [`StoreError`], which has no
/// [`docvault_core::ErrorKind`]. [`docvault_store::MemoryStore`] accepts any `u64`.
pub struct Registry<S: Store> {
    store: S,
}

impl Registry<AnyStore> {
    /// Open the backend named by `config`.
    pub fn open(config: &RegistryConfig) -> Result<Self> {
        let store = config.store.open()?;
        Ok(Self::new(store))
    }
}

impl<S: Store> Registry<S> {
    /// Create a registry over an existing store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ownership checks over this registry's store.
    pub fn guard(&self) -> AuthorizationGuard<'_, S> {
        AuthorizationGuard::new(&self.store)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a document in the primary registry.
    ///
    /// Open to any caller. The caller becomes the document's creator.
    pub async fn register_document(
        &self,
        ctx: &CallContext,
        document: NewDocument,
    ) -> Result<DocumentId> {
        let result = self
            .register_into(DocumentTable::Primary, ctx, document)
            .await;
        traced("register_document", ctx, result)
    }

    /// Register a document in the secondary store.
    ///
    /// Same validators as [`Self::register_document`], same id counter.
    /// Records placed here are invisible to updates, grants and ownership
    /// checks.
    pub async fn advanced_document_registration(
        &self,
        ctx: &CallContext,
        document: NewDocument,
    ) -> Result<DocumentId> {
        let result = self
            .register_into(DocumentTable::Secondary, ctx, document)
            .await;
        traced("advanced_document_registration", ctx, result)
    }

    async fn register_into(
        &self,
        table: DocumentTable,
        ctx: &CallContext,
        document: NewDocument,
    ) -> Result<DocumentId> {
        validate_new_document(&document)?;

        let counter = self.store.document_counter().await?;
        let id = DocumentId::after(counter)
            .ok_or_else(|| StoreError::InvalidData("document counter exhausted".into()))?;

        let record = document.into_record(id, ctx.caller, ctx.now);
        match self.store.insert_document(table, &record).await? {
            InsertResult::Inserted => {
                info!(
                    document_id = %id,
                    caller = %ctx.caller,
                    table = %table,
                    "document registered"
                );
                Ok(id)
            }
            InsertResult::AlreadyExists => Err(RegistryError::DocumentExists(id)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Updates
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace a document's mutable fields, validating each of them.
    ///
    /// Only the creator may update. `classification` and `created_at` are
    /// kept; `updated_at` becomes `ctx.now`.
    pub async fn modify_document(
        &self,
        ctx: &CallContext,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> Result<()> {
        let result = self.apply_update(ctx, id, &update, FieldChecks::Enforced).await;
        traced("modify_document", ctx, result)
    }

    /// Like [`Self::modify_document`], with every field validator enforced.
    pub async fn secure_document_update(
        &self,
        ctx: &CallContext,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> Result<()> {
        let result = self.apply_update(ctx, id, &update, FieldChecks::Enforced).await;
        traced("secure_document_update", ctx, result)
    }

    /// Replace a document's mutable fields without any field validation.
    ///
    /// Existence and ownership are still checked. Out-of-range values (an
    /// empty name, a short digest, a long descriptor, too many tags) are
    /// stored as given.
    pub async fn enhanced_document_modification(
        &self,
        ctx: &CallContext,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> Result<()> {
        let result = self.apply_update(ctx, id, &update, FieldChecks::Skipped).await;
        traced("enhanced_document_modification", ctx, result)
    }

    async fn apply_update(
        &self,
        ctx: &CallContext,
        id: DocumentId,
        update: &DocumentUpdate,
        checks: FieldChecks,
    ) -> Result<()> {
        let table = DocumentTable::Primary;
        let record = self.guard().load_owned(id, &ctx.caller).await?;

        let validated = checks == FieldChecks::Enforced;
        if validated {
            validate_document_update(update)?;
        }

        let updated = record.with_update(update, ctx.now);
        self.store.replace_document(table, &updated).await?;

        info!(
            document_id = %id,
            caller = %ctx.caller,
            table = %table,
            validated,
            "document updated"
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access grants
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant `request.grantee` typed, time-bounded access to a document.
    ///
    /// Only the creator may grant. A grant for an existing
    /// `(document, grantee)` pair replaces the old one entirely.
    pub async fn authorize_access(
        &self,
        ctx: &CallContext,
        document_id: DocumentId,
        request: GrantRequest,
    ) -> Result<()> {
        let result = self.grant(ctx, document_id, &request).await;
        traced("authorize_access", ctx, result)
    }

    async fn grant(
        &self,
        ctx: &CallContext,
        document_id: DocumentId,
        request: &GrantRequest,
    ) -> Result<()> {
        self.guard().load_owned(document_id, &ctx.caller).await?;

        let grant = AccessGrant::issue(document_id, &ctx.caller, request, ctx.now)?;
        let previous = self.store.put_grant(&grant).await?;

        info!(
            document_id = %document_id,
            caller = %ctx.caller,
            grantee = %grant.grantee,
            permission = %grant.permission_type,
            expires_at = grant.expires_at,
            replaced = previous.is_some(),
            "access granted"
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a document from the primary registry.
    pub async fn get_document(&self, id: DocumentId) -> Result<DocumentRecord> {
        self.store
            .get_document(DocumentTable::Primary, id)
            .await?
            .ok_or(RegistryError::DocumentNotFound(id))
    }

    /// Get a document from the secondary store.
    pub async fn get_secondary_document(&self, id: DocumentId) -> Result<DocumentRecord> {
        self.store
            .get_document(DocumentTable::Secondary, id)
            .await?
            .ok_or(RegistryError::DocumentNotFound(id))
    }

    /// Get the grant held by `grantee` on a document, expired or not.
    pub async fn get_grant(
        &self,
        document_id: DocumentId,
        grantee: &Identity,
    ) -> Result<Option<AccessGrant>> {
        Ok(self.store.get_grant(document_id, grantee).await?)
    }

    /// Ids of every document in the primary registry, ascending.
    pub async fn document_ids(&self) -> Result<Vec<DocumentId>> {
        Ok(self.store.document_ids(DocumentTable::Primary).await?)
    }

    /// Ids of every document in the secondary store, ascending.
    pub async fn secondary_document_ids(&self) -> Result<Vec<DocumentId>> {
        Ok(self.store.document_ids(DocumentTable::Secondary).await?)
    }

    /// Every grant on a document, ordered by grantee. Expired grants are
    /// included.
    pub async fn grants_for_document(&self, document_id: DocumentId) -> Result<Vec<AccessGrant>> {
        Ok(self.store.grants_for_document(document_id).await?)
    }

    /// True iff the document exists in the primary registry and `identity`
    /// created it.
    pub async fn is_owner(&self, id: DocumentId, identity: &Identity) -> Result<bool> {
        Ok(self.guard().is_owner(id, identity).await?)
    }

    /// The most recently allocated id across both document stores.
    pub async fn last_document_id(&self) -> Result<Option<DocumentId>> {
        let counter = self.store.document_counter().await?;
        Ok((counter > 0).then_some(DocumentId(counter)))
    }
}

/// Log a rejected operation at debug level and pass the result through.
fn traced<T>(operation: &'static str, ctx: &CallContext, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        match err.kind() {
            Some(kind) => debug!(
                operation,
                caller = %ctx.caller,
                kind = kind.as_str(),
                code = kind.code(),
                "operation rejected"
            ),
            None => debug!(
                operation,
                caller = %ctx.caller,
                error = %err,
                "operation failed"
            ),
        }
    }
    result
}
