//! Resource version strings.
//!
//! A freshly created resource gets a content-derived version: the SHA-256 of
//! its stored document, truncated to 8 bytes and base64 encoded. Later
//! mutations never rehash; they append a fixed suffix to the previous version.

use crate::storage::Document;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Suffix appended to the version on every PATCH.
pub const PATCH_VERSION_SUFFIX: &str = ".patch";

/// Suffix appended to the version on every PUT.
pub const REPLACE_VERSION_SUFFIX: &str = ".replace";

/// Hash the content of a document into a short opaque version.
pub fn content_version(document: &Document) -> String {
    let content = Value::Object(document.clone()).to_string();
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = hasher.finalize();
    BASE64.encode(&hash[..8])
}

/// Derive the next version from the previous one.
///
/// Resources that lost their metadata have no previous version; the content of
/// the new document seeds one instead.
pub fn next_version(previous: &str, suffix: &str, document: &Document) -> String {
    if previous.is_empty() {
        format!("{}{}", content_version(document), suffix)
    } else {
        format!("{}{}", previous, suffix)
    }
}
