//! Error types for the registry.

use docvault_core::{DocumentId, ErrorKind, Identity, ValidationError};
use docvault_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The caller is not the document's creator.
    #[error("not authorized: {caller} does not own document {document_id}")]
    NotAuthorized {
        document_id: DocumentId,
        caller: Identity,
    },

    /// The store already holds a record under a freshly allocated id.
    #[error("document already exists: {0}")]
    DocumentExists(DocumentId),

    /// Document not found.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Field-format or business-rule failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// The taxonomy kind of this error, or `None` for infrastructure failures
    /// (storage, configuration) that sit outside the taxonomy.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RegistryError::NotAuthorized { .. } => Some(ErrorKind::NotAuthorized),
            RegistryError::DocumentExists(_) => Some(ErrorKind::DocumentExists),
            RegistryError::DocumentNotFound(_) => Some(ErrorKind::DocumentNotFound),
            RegistryError::Validation(e) => Some(e.kind()),
            RegistryError::Store(_) | RegistryError::Config(_) => None,
        }
    }

    /// Stable numeric code of [`RegistryError::kind`].
    pub fn code(&self) -> Option<u32> {
        self.kind().map(ErrorKind::code)
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
