//! # Docvault Permissions
//!
//! Typed, time-bounded access grants from a document's creator to other
//! identities.
//!
//! ## Key Concepts
//!
//! - **PermissionType**: `view`, `edit` or `full`
//! - **GrantRequest**: What the caller asks for
//! - **AccessGrant**: What gets stored, keyed by `(document, grantee)`
//!
//! A later grant for the same key replaces the earlier one; there is no
//! revocation history. Expiry is recorded but never enforced here.

pub mod grant;

pub use grant::{AccessGrant, GrantRequest, PermissionType};
