//! Reusable building blocks for resource handlers.
//!
//! * [`metadata`] - [`ScimMetadataManager`], stamping `meta` on created and
//!   modified resources
//! * [`patch`] - PATCH operations over an attribute tree
//! * [`pagination`] - 1-based list windows
//!
//! A handler opts into metadata management by implementing
//! [`ScimMetadataManager::managed_resource_type`]; the stamping methods come
//! with default implementations. [`StandardResourceHandler`] is the in-crate
//! example.
//!
//! [`StandardResourceHandler`]: crate::providers::StandardResourceHandler

pub mod metadata;
pub mod pagination;
pub mod patch;

pub use metadata::ScimMetadataManager;
pub use pagination::{ListRequestParams, Page, paginate};
pub use patch::{PatchOp, PatchOperation, PatchRequest, apply_operations};
