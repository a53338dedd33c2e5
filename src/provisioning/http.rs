//! HTTP provisioning client.

use super::{ForwardError, ProvisionedIds, Provisioner, extract_provisioned_ids};
use crate::config::ProvisioningConfig;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;

/// Forwards mutations to a single downstream endpoint.
///
/// Requests go to `base_uri` (create) or `base_uri/{id}` (update, delete).
/// The configured query parameters are appended to every one of them.
#[derive(Debug, Clone)]
pub struct HttpProvisioner {
    client: Client,
    base_uri: String,
    params: BTreeMap<String, String>,
}

impl HttpProvisioner {
    /// Build a provisioner whose requests time out after the configured bound.
    pub fn new(config: &ProvisioningConfig) -> Result<Self, ForwardError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a provisioner around an existing client.
    pub fn with_client(client: Client, config: &ProvisioningConfig) -> Self {
        Self {
            client,
            base_uri: config.base_uri.trim_end_matches('/').to_string(),
            params: config.params.clone(),
        }
    }

    /// Target URL without query parameters.
    pub fn url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) if !id.is_empty() => format!("{}/{}", self.base_uri, id),
            _ => self.base_uri.clone(),
        }
    }
}

impl Provisioner for HttpProvisioner {
    async fn forward_create(&self, body: &Value) -> Result<ProvisionedIds, ForwardError> {
        let response = self
            .client
            .post(self.url(None))
            .query(&self.params)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::CREATED {
            return Err(ForwardError::UnexpectedStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        debug!("Response from POST provisioning: {}", text);

        let returned: Value = serde_json::from_str(&text)?;
        extract_provisioned_ids(&returned)
    }

    async fn forward_update(&self, id: &str, body: &Value) -> Result<(), ForwardError> {
        let response = self
            .client
            .patch(self.url(Some(id)))
            .query(&self.params)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        debug!("Response from PATCH provisioning ({}): {}", status, text);
        Ok(())
    }

    async fn forward_delete(&self, id: &str) -> Result<(), ForwardError> {
        let response = self
            .client
            .delete(self.url(Some(id)))
            .query(&self.params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        debug!("Response from DELETE provisioning ({}): {}", status, text);
        Ok(())
    }
}
