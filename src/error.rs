//! Error types for SCIM resource operations.
//!
//! [`ScimError`] is the taxonomy handed back to the protocol layer. Each variant
//! carries enough context for a precise client-facing message, and
//! [`ScimError::status_code`] gives the HTTP status the protocol layer should
//! answer with.

use crate::provisioning::ForwardError;
use std::fmt;

/// Main error type for resource handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// The requested resource does not exist
    #[error("Resource {id} not found")]
    NotFound { id: String },

    /// Store connectivity or serialization failure
    #[error("Internal server error: {message}")]
    Internal { message: String },

    /// A patch operation could not be applied as written
    #[error("Invalid patch operation: {message}")]
    InvalidPatch { message: String },

    /// Replication to the provisioning target failed
    #[error("Provisioning {phase} failed: {source}")]
    Forward {
        phase: ForwardPhase,
        #[source]
        source: ForwardError,
    },
}

/// The mutation that was being replicated when forwarding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardPhase {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ForwardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardPhase::Create => write!(f, "create"),
            ForwardPhase::Update => write!(f, "update"),
            ForwardPhase::Delete => write!(f, "delete"),
        }
    }
}

/// Errors that can occur while constructing a resource handler.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The provisioning HTTP client could not be created
    #[error("Failed to build provisioning client: {0}")]
    ProvisioningClient(#[source] ForwardError),
}

impl From<ForwardError> for BuildError {
    fn from(error: ForwardError) -> Self {
        Self::ProvisioningClient(error)
    }
}

impl ScimError {
    /// Create a resource not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an invalid patch error
    pub fn invalid_patch(message: impl Into<String>) -> Self {
        Self::InvalidPatch {
            message: message.into(),
        }
    }

    /// Wrap a forwarding failure with the phase it happened in
    pub fn forward(phase: ForwardPhase, source: ForwardError) -> Self {
        Self::Forward { phase, source }
    }

    /// HTTP status the protocol layer should respond with.
    pub fn status_code(&self) -> u16 {
        match self {
            ScimError::NotFound { .. } => 404,
            ScimError::Internal { .. } => 500,
            ScimError::InvalidPatch { .. } => 400,
            ScimError::Forward { .. } => 502,
        }
    }
}

pub type ScimResult<T> = Result<T, ScimError>;
pub type BuildResult<T> = Result<T, BuildError>;
