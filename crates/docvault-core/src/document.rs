//! Document records and the inputs that create and modify them.
//!
//! A record has two kinds of fields: structural ones fixed at registration
//! (`id`, `creator`, `classification`, `created_at`) and content fields that
//! every update rewrites (`name`, `digest`, `descriptor`, `tags`).

use serde::{Deserialize, Serialize};

use crate::types::{DocumentId, Identity, Timestamp};

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub digest: String,
    pub descriptor: String,
    pub classification: String,
    pub tags: Vec<String>,
}

impl NewDocument {
    pub fn new(
        name: impl Into<String>,
        digest: impl Into<String>,
        descriptor: impl Into<String>,
        classification: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            digest: digest.into(),
            descriptor: descriptor.into(),
            classification: classification.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the stored record for this input.
    pub fn into_record(self, id: DocumentId, creator: Identity, now: Timestamp) -> DocumentRecord {
        DocumentRecord {
            id,
            name: self.name,
            creator,
            digest: self.digest,
            descriptor: self.descriptor,
            classification: self.classification,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The field delta carried by an update. Every field is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    pub name: String,
    pub digest: String,
    pub descriptor: String,
    pub tags: Vec<String>,
}

impl DocumentUpdate {
    pub fn new(
        name: impl Into<String>,
        digest: impl Into<String>,
        descriptor: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            digest: digest.into(),
            descriptor: descriptor.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// A registered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub name: String,
    pub creator: Identity,
    pub digest: String,
    pub descriptor: String,
    pub classification: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DocumentRecord {
    /// Return a copy with the update's fields replaced and `updated_at = now`.
    ///
    /// `id`, `creator`, `classification` and `created_at` are carried over
    /// untouched. No validation happens here.
    pub fn with_update(&self, update: &DocumentUpdate, now: Timestamp) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            name: update.name.clone(),
            creator: self.creator,
            digest: update.digest.clone(),
            descriptor: update.descriptor.clone(),
            classification: self.classification.clone(),
            tags: update.tags.clone(),
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Whether `identity` created this document.
    pub fn is_created_by(&self, identity: &Identity) -> bool {
        self.creator == *identity
    }
}
