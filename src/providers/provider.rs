//! The handler contract consumed by the SCIM protocol layer.
//!
//! The protocol layer parses and validates wire requests, calls one of the six
//! operations below and maps the returned [`ScimError`](crate::ScimError) to an
//! HTTP response.

use crate::error::ScimResult;
use crate::providers::helpers::pagination::{ListRequestParams, Page};
use crate::providers::helpers::patch::PatchOperation;
use crate::resource::{Attributes, Resource};
use std::future::Future;

/// Lifecycle operations for one resource type.
pub trait ResourceHandler {
    /// Create a resource from client-supplied attributes.
    ///
    /// `id` and `meta` in the payload are ignored; `externalId` is kept.
    fn create(&self, attributes: Attributes) -> impl Future<Output = ScimResult<Resource>> + Send;

    /// Get the resource with the given id.
    fn get(&self, id: &str) -> impl Future<Output = ScimResult<Resource>> + Send;

    /// Get one page of resources.
    fn get_all(
        &self,
        params: &ListRequestParams,
    ) -> impl Future<Output = ScimResult<Page<Resource>>> + Send;

    /// Replace every attribute of a resource.
    fn replace(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> impl Future<Output = ScimResult<Resource>> + Send;

    /// Delete a resource.
    fn delete(&self, id: &str) -> impl Future<Output = ScimResult<()>> + Send;

    /// Apply PATCH operations to a resource.
    fn patch(
        &self,
        id: &str,
        operations: &[PatchOperation],
    ) -> impl Future<Output = ScimResult<Resource>> + Send;
}
