//! # Docvault
//!
//! A permissioned document registry. Creators register document metadata and
//! a content fingerprint, update what they own, and grant other identities
//! typed, time-bounded access.
//!
//! ## Overview
//!
//! - **Registration**: Open to anyone. Ids come from one counter shared by
//!   the primary registry and the secondary store.
//! - **Updates**: Creator only. Three entrypoints; one of them skips field
//!   validation.
//! - **Grants**: Creator only. One grant per `(document, grantee)`; a new
//!   grant replaces the old one. Expiry is recorded, not enforced.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docvault::{CallContext, Identity, NewDocument, Registry, RegistryConfig};
//!
//! async fn example() -> docvault::Result<()> {
//!     let registry = Registry::open(&RegistryConfig::default())?;
//!     let ctx = CallContext::new(Identity::from_bytes([1; 32]), 1_700_000_000);
//!
//!     let id = registry
//!         .register_document(
//!             &ctx,
//!             NewDocument::new("Invoice A", "a".repeat(64), "Q1 invoice", "finance", ["tax"]),
//!         )
//!         .await?;
//!
//!     let record = registry.get_document(id).await?;
//!     assert_eq!(record.creator, ctx.caller);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `docvault::core` - Records, identities, validators, error taxonomy
//! - `docvault::perms` - Permission types and access grants
//! - `docvault::store` - Storage abstraction, SQLite and in-memory backends

pub mod config;
pub mod error;
pub mod guard;
pub mod registry;

// Re-export component crates
pub use docvault_core as core;
pub use docvault_perms as perms;
pub use docvault_store as store;

// Re-export main types for convenience
pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use guard::AuthorizationGuard;
pub use registry::Registry;

// Re-export commonly used component types
pub use docvault_core::{
    CallContext, DocumentId, DocumentRecord, DocumentUpdate, ErrorKind, Identity, NewDocument,
    Timestamp,
};
pub use docvault_perms::{AccessGrant, GrantRequest, PermissionType};
pub use docvault_store::{AnyStore, MemoryStore, SqliteStore, StoreConfig};
