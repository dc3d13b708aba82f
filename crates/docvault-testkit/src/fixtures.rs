//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use docvault::{Registry, Result};
use docvault_core::{
    CallContext, ContentDigest, DocumentId, DocumentUpdate, Identity, NewDocument, Timestamp,
};
use docvault_store::MemoryStore;

/// Logical time at which every fixture clock starts.
pub const GENESIS: Timestamp = 1_700_000_000;

/// Derive a deterministic identity from a label.
pub fn identity(label: &str) -> Identity {
    Identity::from_bytes(*blake3::hash(label.as_bytes()).as_bytes())
}

/// Derive `count` distinct identities, `party-0` through `party-{count-1}`.
pub fn multi_party_identities(count: usize) -> Vec<Identity> {
    (0..count).map(|i| identity(&format!("party-{}", i))).collect()
}

/// A registrable document that passes every validator.
pub fn valid_document() -> NewDocument {
    NewDocument::new(
        "Invoice A",
        ContentDigest::of(b"invoice-a.pdf"),
        "Q1 invoice",
        "finance",
        ["tax", "2024"],
    )
}

/// An update that passes every validator.
pub fn valid_update() -> DocumentUpdate {
    DocumentUpdate::new(
        "Invoice A (rev)",
        ContentDigest::of(b"invoice-a-rev.pdf"),
        "Q1 invoice, corrected",
        ["tax"],
    )
}

/// A registry over a fresh [`MemoryStore`], with an owner identity and a
/// logical clock.
pub struct TestFixture {
    pub owner: Identity,
    pub registry: Registry<MemoryStore>,
    clock: AtomicU64,
}

impl TestFixture {
    /// Create a fixture whose owner is derived from `"owner"`.
    pub fn new() -> Self {
        Self::with_owner(identity("owner"))
    }

    /// Create a fixture with a specific owner.
    pub fn with_owner(owner: Identity) -> Self {
        Self {
            owner,
            registry: Registry::new(MemoryStore::new()),
            clock: AtomicU64::new(GENESIS),
        }
    }

    /// Current logical time, without advancing it.
    pub fn now(&self) -> Timestamp {
        self.clock.load(Ordering::SeqCst)
    }

    /// Move the clock forward by `by` and return the new time.
    pub fn advance(&self, by: u64) -> Timestamp {
        self.clock.fetch_add(by, Ordering::SeqCst) + by
    }

    /// Context for a call by `caller` at the current time.
    pub fn ctx(&self, caller: Identity) -> CallContext {
        CallContext::new(caller, self.now())
    }

    /// Context for a call by the owner at the current time.
    pub fn owner_ctx(&self) -> CallContext {
        self.ctx(self.owner)
    }

    /// Register [`valid_document`] as the owner.
    pub async fn register(&self) -> Result<DocumentId> {
        self.registry
            .register_document(&self.owner_ctx(), valid_document())
            .await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
