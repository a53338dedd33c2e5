//! Replication of resource mutations to a downstream identity system.
//!
//! The resource handler talks to the downstream system through the
//! [`Provisioner`] trait. [`HttpProvisioner`] is the implementation used in
//! production; tests can substitute their own.
//!
//! Create forwarding is strict: only `201 Created` with a body carrying string
//! `id` and `externalId` fields counts as success. Update and delete
//! forwarding only fail on transport errors; whatever the target answers is
//! logged and otherwise ignored.

pub mod http;

pub use http::HttpProvisioner;

use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Identifiers the downstream system reports for a created resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedIds {
    pub id: String,
    pub external_id: String,
}

/// Errors raised while forwarding a mutation.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Provisioning target responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Not found {field} as string in provisioning response")]
    MissingField { field: String },

    #[error("Invalid provisioning response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Request to provisioning target failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request to provisioning target timed out after {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Outbound replication of mutations.
pub trait Provisioner: Send + Sync {
    /// Replicate a newly created resource.
    fn forward_create(
        &self,
        body: &Value,
    ) -> impl Future<Output = Result<ProvisionedIds, ForwardError>> + Send;

    /// Replicate a change to the resource `id`.
    fn forward_update(
        &self,
        id: &str,
        body: &Value,
    ) -> impl Future<Output = Result<(), ForwardError>> + Send;

    /// Replicate the removal of the resource `id`.
    fn forward_delete(&self, id: &str) -> impl Future<Output = Result<(), ForwardError>> + Send;
}

/// Pull the identifiers out of a create response body.
pub fn extract_provisioned_ids(body: &Value) -> Result<ProvisionedIds, ForwardError> {
    let string_field = |field: &str| {
        body.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ForwardError::missing_field(field))
    };

    let external_id = string_field("externalId")?;
    let id = string_field("id")?;
    Ok(ProvisionedIds { id, external_id })
}
