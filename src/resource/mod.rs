//! SCIM resource model.
//!
//! # Key Components
//!
//! * [`Resource`] - A user resource in protocol shape
//! * [`Meta`] - Resource metadata, with [`MetaField`] mapping its keys to and
//!   from their case-folded storage form
//! * [`normalize`] - Stored document ⇄ resource conversion and null pruning
//! * [`version`] - Content-hash versions and suffix-derived successors

pub mod meta;
pub mod normalize;
pub mod resource;
pub mod version;

pub use meta::{Meta, MetaField};
pub use resource::{Attributes, RESERVED_KEYS, Resource};
