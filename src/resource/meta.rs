//! Resource metadata and its case-folded storage keys.
//!
//! In memory and on the wire the `meta` sub-attributes use mixed case
//! (`resourceType`, `lastModified`). The persisted form folds them to lower
//! case. [`MetaField`] is the single table both directions go through.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SCIM resource metadata.
///
/// `Meta::default()` is the zero value returned when stored metadata cannot
/// be recovered: every string is empty and both timestamps are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    pub location: String,
}

impl Meta {
    /// Metadata for a resource created at `now`.
    pub fn for_creation(
        resource_type: impl Into<String>,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            created: Some(now),
            last_modified: Some(now),
            version: String::new(),
            location: location.into(),
        }
    }

    /// True for the zero value.
    pub fn is_empty(&self) -> bool {
        *self == Meta::default()
    }
}

/// The sub-attributes of `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    ResourceType,
    Created,
    LastModified,
    Version,
    Location,
}

const META_FIELDS: [MetaField; 5] = [
    MetaField::ResourceType,
    MetaField::Created,
    MetaField::LastModified,
    MetaField::Version,
    MetaField::Location,
];

impl MetaField {
    /// All fields in storage order.
    pub fn all() -> impl Iterator<Item = MetaField> {
        META_FIELDS.into_iter()
    }

    /// Mixed-case name used in memory and on the wire.
    pub fn name(self) -> &'static str {
        match self {
            MetaField::ResourceType => "resourceType",
            MetaField::Created => "created",
            MetaField::LastModified => "lastModified",
            MetaField::Version => "version",
            MetaField::Location => "location",
        }
    }

    /// Lower-cased key used in the persisted document.
    pub fn storage_key(self) -> &'static str {
        match self {
            MetaField::ResourceType => "resourcetype",
            MetaField::Created => "created",
            MetaField::LastModified => "lastmodified",
            MetaField::Version => "version",
            MetaField::Location => "location",
        }
    }

    /// Resolve a key in any casing to its field.
    pub fn lookup(key: &str) -> Option<MetaField> {
        META_FIELDS
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a timestamp the way it is persisted.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a persisted timestamp.
///
/// Unparseable input yields the zero timestamp (the Unix epoch) instead of an
/// error.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_default()
}
