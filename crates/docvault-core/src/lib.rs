//! # Docvault Core
//!
//! Pure primitives for Docvault: document records, identities, and the
//! field-format validators that gate every registry mutation.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over plain data.
//!
//! ## Key Types
//!
//! - [`DocumentRecord`] - A registered document's metadata and fingerprint
//! - [`DocumentId`] - Identifier allocated from the shared counter
//! - [`Identity`] - Opaque caller identity
//! - [`CallContext`] - Caller and logical time of an operation
//! - [`ErrorKind`] - The stable error taxonomy
//!
//! ## Validation
//!
//! See the [`validation`] module. Each predicate maps onto one [`ErrorKind`].

pub mod digest;
pub mod document;
pub mod error;
pub mod types;
pub mod validation;

pub use digest::ContentDigest;
pub use document::{DocumentRecord, DocumentUpdate, NewDocument};
pub use error::{ErrorKind, ValidationError};
pub use types::{CallContext, DocumentId, Identity, Timestamp};
pub use validation::{validate_document_update, validate_new_document};
