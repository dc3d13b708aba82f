//! # Docvault Testkit
//!
//! Testing utilities for Docvault.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A registry over an in-memory store, deterministic
//!   identities and a logical clock
//! - **Generators**: Proptest strategies for valid and invalid field values
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use docvault_core::validate_new_document;
//! use docvault_testkit::generators::new_document;
//!
//! proptest! {
//!     #[test]
//!     fn generated_documents_validate(doc in new_document()) {
//!         prop_assert!(validate_new_document(&doc).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use docvault_testkit::fixtures::{multi_party_identities, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let id = fixture.register().await?;
//! let readers = multi_party_identities(2);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{identity, multi_party_identities, valid_document, valid_update, TestFixture};
pub use generators::{document_update, grant_request, new_document};
