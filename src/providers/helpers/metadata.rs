//! SCIM metadata management helper trait.
//!
//! Stamps `meta` on created and modified resources. Anything that knows which
//! [`ResourceType`] it serves gets the default implementations.

use crate::config::ResourceType;
use crate::resource::normalize::to_document;
use crate::resource::version::{content_version, next_version};
use crate::resource::{Meta, Resource};
use crate::storage::Document;
use chrono::{DateTime, Utc};

pub trait ScimMetadataManager {
    /// The resource type whose metadata is being managed.
    fn managed_resource_type(&self) -> &ResourceType;

    /// Set creation metadata: both timestamps to `now`, type and location from
    /// the resource type. The version is left empty until the content is final.
    fn add_creation_metadata(&self, resource: &mut Resource, now: DateTime<Utc>) {
        let resource_type = self.managed_resource_type();
        resource.meta = Meta::for_creation(
            resource_type.name.clone(),
            resource_type.location_for(&resource.id),
            now,
        );
    }

    /// Version a resource by its content and return the document to store.
    fn finalize_with_content_version(&self, resource: &mut Resource) -> Document {
        let resource_type = &self.managed_resource_type().name;
        resource.meta.version.clear();
        resource.meta.version = content_version(&to_document(resource, resource_type));
        to_document(resource, resource_type)
    }

    /// Set modification metadata from the metadata the resource had before.
    ///
    /// `created` is carried forward, `lastModified` becomes `now` and the
    /// version gets `suffix` appended. Type and location are rebuilt when the
    /// previous metadata was lost.
    fn update_modification_metadata(
        &self,
        resource: &mut Resource,
        previous: &Meta,
        suffix: &str,
        now: DateTime<Utc>,
    ) -> Document {
        let configured = self.managed_resource_type();
        let resource_type = if previous.resource_type.is_empty() {
            configured.name.clone()
        } else {
            previous.resource_type.clone()
        };
        let location = if previous.location.is_empty() {
            configured.location_for(&resource.id)
        } else {
            previous.location.clone()
        };

        resource.meta = Meta {
            resource_type,
            created: previous.created,
            last_modified: Some(now),
            version: String::new(),
            location,
        };
        let seed = to_document(resource, &configured.name);
        resource.meta.version = next_version(&previous.version, suffix, &seed);
        to_document(resource, &configured.name)
    }
}
