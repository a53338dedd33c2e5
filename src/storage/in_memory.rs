//! In-memory document store.
//!
//! Thread-safe implementation of [`DocumentStore`] backed by a vector behind a
//! tokio `RwLock`. Documents are kept in insertion order, which makes
//! `list_all` stable between calls as long as nothing is written in between.
//!
//! Like a document database, the store stamps each inserted document with its
//! own `_id` key. The normalizer strips it on the way out.

use crate::storage::{Document, DocumentStore, StoreError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Thread-safe in-memory document store.
///
/// Cloning is cheap; clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
    next_key: Arc<AtomicU64>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStoreStats {
        let documents = self.documents.read().await;
        InMemoryStoreStats {
            total_documents: documents.len(),
            total_inserts: self.next_key.load(Ordering::Relaxed),
        }
    }

    /// Clear all data (useful for testing).
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    fn document_id(document: &Document) -> Option<&str> {
        document.get("id").and_then(Value::as_str)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    type Error = StoreError;

    async fn insert(&self, mut document: Document) -> Result<(), Self::Error> {
        let id = Self::document_id(&document)
            .ok_or_else(|| StoreError::invalid_document("document has no string 'id' field"))?
            .to_string();

        let mut documents = self.documents.write().await;
        if documents
            .iter()
            .any(|existing| Self::document_id(existing) == Some(id.as_str()))
        {
            return Err(StoreError::DuplicateId { id });
        }

        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        document.insert("_id".to_string(), json!(key));
        documents.push(document);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, Self::Error> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|document| Self::document_id(document) == Some(id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Document>, Self::Error> {
        Ok(self.documents.read().await.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Self::Error> {
        let mut documents = self.documents.write().await;
        documents.retain(|document| Self::document_id(document) != Some(id));
        Ok(())
    }
}

/// Statistics about the current state of the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStoreStats {
    /// Number of documents currently stored
    pub total_documents: usize,
    /// Number of successful inserts since the store was created
    pub total_inserts: u64,
}
