//! Handler configuration.
//!
//! Everything the resource handler needs to know about its environment is
//! passed in through [`HandlerConfig`] at construction time and owned by the
//! handler for its whole lifetime.
//!
//! The configuration deserializes with serde, so it can be embedded in
//! whatever file format the hosting server uses:
//!
//! ```rust
//! use scim_provisioner::config::HandlerConfig;
//! use serde_json::json;
//!
//! let config: HandlerConfig = serde_json::from_value(json!({
//!     "resource_type": {"id": "User", "name": "User", "endpoint": "/Users"},
//!     "provisioning": {
//!         "base_uri": "https://idm.example.com/api/users",
//!         "params": {"client_id": "scim-bridge"}
//!     }
//! })).unwrap();
//!
//! assert_eq!(config.store_timeout_ms, 5_000);
//! assert_eq!(config.provisioning.unwrap().timeout_ms, 10_000);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the provisioning target's base URI.
pub const PROVISIONING_URL_ENV: &str = "PROVISIONING_CLIENT_URL";
/// Environment variable holding the client identifier sent to the target.
pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
/// Environment variable overriding the forwarding timeout, in seconds.
pub const PROVISIONING_TIMEOUT_ENV: &str = "PROVISIONING_TIMEOUT_SECS";

const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_FORWARD_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Describes the resource type a handler serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    pub name: String,
    /// Endpoint path, e.g. `/Users`.
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceType {
    /// The core SCIM user resource type.
    pub fn user() -> Self {
        Self {
            id: "User".to_string(),
            name: "User".to_string(),
            endpoint: "/Users".to_string(),
            description: Some("User Account".to_string()),
        }
    }

    /// Relative location of a resource: the endpoint without its leading
    /// slash, then the percent-encoded id.
    pub fn location_for(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_start_matches('/'),
            urlencoding::encode(id)
        )
    }
}

/// Where and how mutations are replicated downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    pub base_uri: String,
    /// Query parameters appended to every request.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Per-request bound, in milliseconds.
    #[serde(default = "default_forward_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_forward_timeout_ms() -> u64 {
    DEFAULT_FORWARD_TIMEOUT_MS
}

fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ProvisioningConfig {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            params: BTreeMap::new(),
            timeout_ms: DEFAULT_FORWARD_TIMEOUT_MS,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_ms(timeout);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Read provisioning settings from the process environment.
    ///
    /// Returns `Ok(None)` when no provisioning URL is set, which disables
    /// forwarding.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(base_uri) = lookup(PROVISIONING_URL_ENV).filter(|url| !url.trim().is_empty())
        else {
            return Ok(None);
        };

        let mut config = Self::new(base_uri.trim_end_matches('/'));
        if let Some(client_id) = lookup(CLIENT_ID_ENV).filter(|id| !id.is_empty()) {
            config = config.with_param("client_id", client_id);
        }
        if let Some(raw) = lookup(PROVISIONING_TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: PROVISIONING_TIMEOUT_ENV.to_string(),
                value: raw.clone(),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(Some(config))
    }
}

/// Configuration owned by a resource handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub resource_type: ResourceType,
    /// Downstream replication. `None` disables forwarding.
    #[serde(default)]
    pub provisioning: Option<ProvisioningConfig>,
    /// Upper bound for every individual store call, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new(ResourceType::user())
    }
}

impl HandlerConfig {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            provisioning: None,
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }

    pub fn with_provisioning(mut self, provisioning: ProvisioningConfig) -> Self {
        self.provisioning = Some(provisioning);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout_ms = duration_to_ms(timeout);
        self
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Bound applied to forwarding calls.
    pub fn forward_timeout(&self) -> Duration {
        self.provisioning
            .as_ref()
            .map(ProvisioningConfig::timeout)
            .unwrap_or(Duration::from_millis(DEFAULT_FORWARD_TIMEOUT_MS))
    }
}
