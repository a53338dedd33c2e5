//! SCIM PATCH operations on an attribute tree.
//!
//! Operations are applied strictly in request order and each one sees the
//! effects of the ones before it.
//!
//! | op      | with path                  | without path                                  |
//! |---------|----------------------------|-----------------------------------------------|
//! | add     | `attributes[path] = value` | per key of `value`: array onto array extends, otherwise set |
//! | replace | `attributes[path] = value` | per key of `value`: set                        |
//! | remove  | `attributes[path] = null`  | `attributes[""] = null`                        |
//!
//! Removal only writes a null. The null disappears when the tree is normalized
//! before it is stored again. A remove without a path therefore leaves every
//! attribute in place.
//!
//! # Usage
//!
//! ```rust
//! use scim_provisioner::providers::helpers::patch::{PatchOperation, apply_operations};
//! use serde_json::json;
//!
//! let mut attributes = json!({"emails": ["b@x.com"]}).as_object().cloned().unwrap_or_default();
//! let operations = vec![
//!     PatchOperation::add("", json!({"emails": ["a@x.com"]})),
//!     PatchOperation::replace("nickName", json!("Babs")),
//! ];
//! apply_operations(&mut attributes, &operations).unwrap();
//!
//! assert_eq!(attributes["emails"], json!(["b@x.com", "a@x.com"]));
//! assert_eq!(attributes["nickName"], json!("Babs"));
//! ```

use crate::error::{ScimError, ScimResult};
use crate::resource::Attributes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The PATCH operation kind. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl FromStr for PatchOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(PatchOp::Add),
            "replace" => Ok(PatchOp::Replace),
            "remove" => Ok(PatchOp::Remove),
            _ => Err(format!("Unsupported PATCH operation: {}", s)),
        }
    }
}

impl TryFrom<String> for PatchOp {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Add => write!(f, "add"),
            PatchOp::Replace => write!(f, "replace"),
            PatchOp::Remove => write!(f, "remove"),
        }
    }
}

/// A single PATCH operation.
///
/// An empty `path` targets the resource as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    /// Apply this operation to `attributes`.
    pub fn apply_to(&self, attributes: &mut Attributes) -> ScimResult<()> {
        if is_readonly_path(&self.path) {
            return Err(ScimError::invalid_patch(format!(
                "Cannot modify readonly attribute: {}",
                self.path
            )));
        }

        match self.op {
            PatchOp::Add | PatchOp::Replace => {
                let value = self.value.as_ref().ok_or_else(|| {
                    ScimError::invalid_patch(format!("{} operation requires a value", self.op))
                })?;
                if self.path.is_empty() {
                    self.merge_into(attributes, value)
                } else {
                    attributes.insert(self.path.clone(), value.clone());
                    Ok(())
                }
            }
            PatchOp::Remove => {
                attributes.insert(self.path.clone(), Value::Null);
                Ok(())
            }
        }
    }

    fn merge_into(&self, attributes: &mut Attributes, value: &Value) -> ScimResult<()> {
        let Value::Object(incoming) = value else {
            return Err(ScimError::invalid_patch(format!(
                "{} operation without a path requires an object value",
                self.op
            )));
        };

        if let Some(key) = incoming.keys().find(|key| is_readonly_path(key)) {
            return Err(ScimError::invalid_patch(format!(
                "Cannot modify readonly attribute: {}",
                key
            )));
        }

        for (key, value) in incoming {
            if self.op == PatchOp::Add {
                if let (Some(Value::Array(existing)), Value::Array(items)) =
                    (attributes.get_mut(key), value)
                {
                    existing.extend(items.iter().cloned());
                    continue;
                }
            }
            attributes.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// A PATCH request body as sent by SCIM clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            operations,
        }
    }

    /// Parse a request body, reporting malformed operations as
    /// [`ScimError::InvalidPatch`].
    pub fn from_json(body: Value) -> ScimResult<Self> {
        serde_json::from_value(body).map_err(|e| ScimError::invalid_patch(e.to_string()))
    }
}

/// Apply `operations` to `attributes` in order, stopping at the first failure.
pub fn apply_operations(
    attributes: &mut Attributes,
    operations: &[PatchOperation],
) -> ScimResult<()> {
    for operation in operations {
        operation.apply_to(attributes)?;
    }
    Ok(())
}

/// `id` and `meta` are server-managed.
fn is_readonly_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path == "id" || path == "meta" || path.starts_with("meta.")
}
