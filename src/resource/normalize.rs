//! Conversion between stored documents and protocol-shaped resources.
//!
//! Both directions are pure. The store hands back a flat document in which
//! `id`, `externalId` and `meta` sit next to the attributes and the `meta` keys
//! are lower-cased; [`to_resource`] pulls those apart again and
//! [`to_document`] folds them back in.
//!
//! ```rust
//! use scim_provisioner::resource::normalize::{to_document, to_resource};
//! use serde_json::json;
//!
//! let stored = json!({
//!     "id": "2819c223",
//!     "userName": "bjensen",
//!     "nickName": null,
//!     "meta": {"resourcetype": "User", "location": "Users/2819c223"}
//! });
//! let resource = to_resource(stored.as_object().cloned().unwrap_or_default());
//! assert_eq!(resource.id, "2819c223");
//! assert_eq!(resource.meta.resource_type, "User");
//! assert!(resource.get_attribute("nickName").is_none());
//!
//! let document = to_document(&resource, "User");
//! assert_eq!(document["meta"]["resourcetype"], json!("User"));
//! ```

use super::meta::{Meta, MetaField, format_timestamp, parse_timestamp};
use super::resource::{Attributes, RESERVED_KEYS, Resource};
use crate::storage::{Document, STORAGE_ONLY_FIELDS};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Convert a stored document into a resource.
///
/// Never fails: a missing or mistyped `id` becomes the empty string, a
/// mistyped `externalId` is dropped and unrecoverable metadata becomes the
/// zero [`Meta`].
pub fn to_resource(mut document: Document) -> Resource {
    for key in STORAGE_ONLY_FIELDS {
        document.remove(*key);
    }

    let id = match document.remove("id") {
        Some(Value::String(id)) => id,
        _ => String::new(),
    };
    let external_id = match document.remove("externalId") {
        Some(Value::String(external_id)) => Some(external_id),
        _ => None,
    };
    let meta = extract_meta(document.remove("meta").as_ref());

    prune_nulls(&mut document);

    Resource {
        id,
        external_id,
        attributes: document,
        meta,
    }
}

/// Convert a resource into the document persisted for it.
///
/// `meta.resourcetype` is always taken from `resource_type`.
pub fn to_document(resource: &Resource, resource_type: &str) -> Document {
    let mut document = resource.attributes.clone();
    for key in RESERVED_KEYS {
        document.remove(key);
    }

    document.insert("id".to_string(), Value::String(resource.id.clone()));
    if let Some(external_id) = &resource.external_id {
        document.insert("externalId".to_string(), Value::String(external_id.clone()));
    }
    document.insert(
        "meta".to_string(),
        Value::Object(render_meta(&resource.meta, resource_type)),
    );

    document
}

/// Recursively remove every null-valued key.
///
/// Descends into nested objects and into objects held in arrays. Array
/// elements that are not objects are left as they are.
pub fn prune_nulls(attributes: &mut Attributes) {
    attributes.retain(|_, value| !value.is_null());
    for value in attributes.values_mut() {
        match value {
            Value::Object(nested) => prune_nulls(nested),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::Object(element) = item {
                        prune_nulls(element);
                    }
                }
            }
            _ => {}
        }
    }
}

fn extract_meta(stored: Option<&Value>) -> Meta {
    let Some(Value::Object(stored)) = stored else {
        return Meta::default();
    };

    let fields: HashMap<MetaField, &str> = stored
        .iter()
        .filter_map(|(key, value)| Some((MetaField::lookup(key)?, value.as_str()?)))
        .collect();

    let (Some(resource_type), Some(location)) = (
        fields.get(&MetaField::ResourceType),
        fields.get(&MetaField::Location),
    ) else {
        return Meta::default();
    };

    Meta {
        resource_type: resource_type.to_string(),
        created: fields.get(&MetaField::Created).map(|raw| parse_timestamp(raw)),
        last_modified: fields
            .get(&MetaField::LastModified)
            .map(|raw| parse_timestamp(raw)),
        version: fields
            .get(&MetaField::Version)
            .map(|version| version.to_string())
            .unwrap_or_default(),
        location: location.to_string(),
    }
}

fn render_meta(meta: &Meta, resource_type: &str) -> Map<String, Value> {
    let mut rendered = Map::new();
    for field in MetaField::all() {
        let value = match field {
            MetaField::ResourceType => Some(resource_type.to_string()),
            MetaField::Created => meta.created.as_ref().map(format_timestamp),
            MetaField::LastModified => meta.last_modified.as_ref().map(format_timestamp),
            MetaField::Version => Some(meta.version.clone()).filter(|v| !v.is_empty()),
            MetaField::Location => Some(meta.location.clone()),
        };
        if let Some(value) = value {
            rendered.insert(field.storage_key().to_string(), Value::String(value));
        }
    }
    rendered
}
