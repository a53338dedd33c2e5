//! Resource handler implementations.
//!
//! * [`ResourceHandler`] - the contract consumed by the protocol layer
//! * [`StandardResourceHandler`] - implementation over a pluggable
//!   [`DocumentStore`](crate::storage::DocumentStore) with optional downstream
//!   provisioning

pub mod helpers;
pub mod provider;
pub mod standard;

pub use helpers::pagination::{ListRequestParams, Page};
pub use helpers::patch::{PatchOp, PatchOperation, PatchRequest};
pub use provider::ResourceHandler;
pub use standard::StandardResourceHandler;
