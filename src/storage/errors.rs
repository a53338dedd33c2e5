//! Storage-specific error types.
//!
//! These errors describe persistence failures only. The resource handler turns
//! every one of them into [`crate::ScimError::Internal`].

use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A document with the same `id` is already stored.
    #[error("Document with id '{id}' already exists")]
    DuplicateId { id: String },

    /// The document cannot be stored as given.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// The backend could not be reached.
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
