//! Document storage abstraction for SCIM resources.
//!
//! The store persists flat attribute documents and knows nothing about SCIM
//! semantics. Reconstructing `id`, `externalId` and `meta` from a stored
//! document is the normalizer's job (see [`crate::resource::normalize`]).
//!
//! # Contract
//!
//! - `insert` persists a new document and fails on connectivity or constraint
//!   problems.
//! - `find_by_id` returns `None` rather than an error when nothing matches.
//! - `list_all` returns every document in storage-defined order.
//! - `delete_by_id` is a no-op when the document is absent.
//!
//! Each call is independent. No transaction spans multiple calls, so a
//! read-delete-insert sequence issued by the handler is not atomic.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_provisioner::storage::{DocumentStore, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryDocumentStore::new();
//! let document = json!({"id": "123", "userName": "john.doe"});
//! store.insert(document.as_object().cloned().unwrap_or_default()).await?;
//!
//! let found = store.find_by_id("123").await?;
//! assert!(found.is_some());
//!
//! store.delete_by_id("123").await?;
//! assert!(store.find_by_id("123").await?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StoreError;
pub use in_memory::{InMemoryDocumentStore, InMemoryStoreStats};

use serde_json::{Map, Value};
use std::future::Future;

/// A stored document: a flat JSON object addressed by its `id` field.
pub type Document = Map<String, Value>;

/// Top-level keys a backend adds for its own bookkeeping. They are never part
/// of a resource.
pub const STORAGE_ONLY_FIELDS: &[&str] = &["_id"];

/// Persistence operations consumed by the resource handler.
///
/// Implementations are shared across all requests, so they must be cheap to
/// share and safe to call concurrently.
pub trait DocumentStore: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new document.
    fn insert(&self, document: Document)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Find the document whose `id` field equals `id`.
    ///
    /// Returns `Ok(None)` when no such document exists.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send;

    /// Return every stored document.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send;

    /// Remove the document with the given `id`. Absent documents are not an error.
    fn delete_by_id(&self, id: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
