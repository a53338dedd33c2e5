//! SCIM user-provisioning resource engine.
//!
//! Implements the storage-facing half of a SCIM 2.0 service: create, read,
//! list, replace, patch and delete of resources backed by a document store,
//! with every successful mutation replicated to a downstream provisioning
//! system.
//!
//! # Core Components
//!
//! - [`StandardResourceHandler`] - The six lifecycle operations for one resource type
//! - [`DocumentStore`] - Trait for implementing storage backends
//! - [`Provisioner`] - Trait for replicating mutations downstream
//! - [`resource::normalize`] - Conversion between stored documents and resources
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scim_provisioner::config::{HandlerConfig, ProvisioningConfig};
//! use scim_provisioner::providers::{ListRequestParams, ResourceHandler, StandardResourceHandler};
//! use scim_provisioner::storage::InMemoryDocumentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = HandlerConfig::default();
//! if let Some(provisioning) = ProvisioningConfig::from_env()? {
//!     config = config.with_provisioning(provisioning);
//! }
//!
//! let handler = StandardResourceHandler::new(InMemoryDocumentStore::new(), config)?;
//! let page = handler.get_all(&ListRequestParams::default()).await?;
//! println!("{} users", page.total_results);
//! # Ok(())
//! # }
//! ```
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod config;
pub mod error;
pub mod providers;
pub mod provisioning;
pub mod resource;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{HandlerConfig, ProvisioningConfig, ResourceType};
pub use error::{BuildError, ForwardPhase, ScimError, ScimResult};
pub use providers::{
    ListRequestParams, Page, PatchOp, PatchOperation, PatchRequest, ResourceHandler,
    StandardResourceHandler,
};
pub use provisioning::{ForwardError, HttpProvisioner, ProvisionedIds, Provisioner};
pub use resource::{Attributes, Meta, Resource};
pub use storage::{Document, DocumentStore, InMemoryDocumentStore, StoreError};
