//! The SCIM resource exchanged with the protocol layer.

use super::meta::Meta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute tree of a resource: every field other than `id`, `externalId`
/// and `meta`.
pub type Attributes = Map<String, Value>;

/// Keys that never appear inside [`Attributes`].
pub const RESERVED_KEYS: [&str; 3] = ["id", "externalId", "meta"];

/// A user resource in protocol shape.
///
/// Serializes to the SCIM wire form: attributes flattened at the top level
/// next to `id`, `externalId` and `meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default)]
    pub meta: Meta,
}

impl Resource {
    /// Get a top-level attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get the `userName` attribute if present.
    pub fn get_username(&self) -> Option<&str> {
        self.get_attribute("userName").and_then(Value::as_str)
    }

    /// Wire representation of the resource.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Attributes plus `id` and `externalId`: the body replicated to the
    /// provisioning target.
    pub fn provisioning_body(&self) -> Value {
        let mut body = self.attributes.clone();
        body.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(external_id) = &self.external_id {
            body.insert("externalId".to_string(), Value::String(external_id.clone()));
        }
        Value::Object(body)
    }
}
