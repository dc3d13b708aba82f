//! # Docvault Store
//!
//! Storage abstraction for Docvault. Provides a trait-based interface for
//! registry persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts the registry's four pieces of state behind
//! the [`Store`] trait:
//!
//! - the primary document map (`id -> record`)
//! - the secondary document map (`id -> record`)
//! - the grant map (`(id, grantee) -> grant`)
//! - the shared id counter
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`AnyStore`] / [`StoreConfig`] - Backend chosen at runtime
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docvault_store::{DocumentTable, SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("docvault.db").unwrap();
//!     let counter = store.document_counter().await.unwrap();
//!     let ids = store.document_ids(DocumentTable::Primary).await.unwrap();
//!     println!("{} documents, counter at {}", ids.len(), counter);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic registration**: `insert_document` writes the record and the
//!   counter together, refusing any id other than `counter + 1`
//! - **Overwrite grants**: a grant replaces whatever was under its key

pub mod backend;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use backend::{AnyStore, StoreConfig};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentTable, InsertResult, Store};
