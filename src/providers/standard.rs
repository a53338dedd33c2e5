//! Standard resource handler with pluggable storage and provisioning.
//!
//! [`StandardResourceHandler`] implements the [`ResourceHandler`] contract on
//! top of any [`DocumentStore`], replicating mutations through an optional
//! [`Provisioner`].
//!
//! # Example Usage
//!
//! ```rust
//! use scim_provisioner::config::HandlerConfig;
//! use scim_provisioner::providers::{ResourceHandler, StandardResourceHandler};
//! use scim_provisioner::storage::InMemoryDocumentStore;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = StandardResourceHandler::new(InMemoryDocumentStore::new(), HandlerConfig::default())?;
//!
//! let attributes = json!({"userName": "bjensen"}).as_object().cloned().unwrap_or_default();
//! let user = handler.create(attributes).await?;
//! assert_eq!(handler.get(&user.id).await?.get_username(), Some("bjensen"));
//! # Ok(())
//! # }
//! ```
//!
//! Replace and patch are read, delete, insert with no lock spanning the three
//! steps. Concurrent mutations of the same resource can lose updates.

use crate::config::{HandlerConfig, ResourceType};
use crate::error::{BuildResult, ForwardPhase, ScimError, ScimResult};
use crate::providers::ResourceHandler;
use crate::providers::helpers::metadata::ScimMetadataManager;
use crate::providers::helpers::pagination::{ListRequestParams, Page, paginate};
use crate::providers::helpers::patch::{PatchOperation, apply_operations};
use crate::provisioning::{ForwardError, HttpProvisioner, Provisioner};
use crate::resource::normalize::{prune_nulls, to_resource};
use crate::resource::version::{PATCH_VERSION_SUFFIX, REPLACE_VERSION_SUFFIX};
use crate::resource::{Attributes, Meta, Resource};
use crate::storage::{Document, DocumentStore};
use chrono::Utc;
use log::{debug, info, trace, warn};
use serde_json::Value;
use std::future::Future;
use tokio::time::timeout;
use uuid::Uuid;

/// Resource handler for one resource type.
#[derive(Debug, Clone)]
pub struct StandardResourceHandler<S: DocumentStore, P: Provisioner = HttpProvisioner> {
    store: S,
    config: HandlerConfig,
    provisioner: Option<P>,
}

impl<S: DocumentStore> StandardResourceHandler<S, HttpProvisioner> {
    /// Create a handler that forwards over HTTP when `config.provisioning` is
    /// set.
    pub fn new(store: S, config: HandlerConfig) -> BuildResult<Self> {
        let provisioner = config
            .provisioning
            .as_ref()
            .map(HttpProvisioner::new)
            .transpose()?;
        Ok(Self::with_provisioner(store, config, provisioner))
    }
}

impl<S: DocumentStore, P: Provisioner> StandardResourceHandler<S, P> {
    /// Create a handler around an explicit provisioner. `None` disables
    /// forwarding.
    pub fn with_provisioner(store: S, config: HandlerConfig, provisioner: Option<P>) -> Self {
        Self {
            store,
            config,
            provisioner,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn bounded_store<T>(
        &self,
        action: &str,
        operation: impl Future<Output = Result<T, S::Error>>,
    ) -> ScimResult<T> {
        let limit = self.config.store_timeout();
        match timeout(limit, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ScimError::internal(format!(
                "Storage error during {}: {}",
                action, e
            ))),
            Err(_) => Err(ScimError::internal(format!(
                "Storage {} timed out after {:?}",
                action, limit
            ))),
        }
    }

    async fn bounded_forward<T>(
        &self,
        operation: impl Future<Output = Result<T, ForwardError>>,
    ) -> Result<T, ForwardError> {
        let limit = self.config.forward_timeout();
        timeout(limit, operation)
            .await
            .unwrap_or(Err(ForwardError::Timeout(limit)))
    }

    async fn find_existing(&self, id: &str) -> ScimResult<Document> {
        self.bounded_store("find", self.store.find_by_id(id))
            .await?
            .ok_or_else(|| ScimError::not_found(id))
    }

    async fn forward_update_best_effort(&self, resource: &Resource) {
        let Some(provisioner) = &self.provisioner else {
            return;
        };
        let body = resource.provisioning_body();
        if let Err(e) = self
            .bounded_forward(provisioner.forward_update(&resource.id, &body))
            .await
        {
            warn!("{}", ScimError::forward(ForwardPhase::Update, e));
        }
    }

    async fn forward_delete_best_effort(&self, id: &str) {
        let Some(provisioner) = &self.provisioner else {
            return;
        };
        if let Err(e) = self.bounded_forward(provisioner.forward_delete(id)).await {
            warn!("{}", ScimError::forward(ForwardPhase::Delete, e));
        }
    }

    fn resource_type_name(&self) -> &str {
        &self.config.resource_type.name
    }
}

impl<S: DocumentStore, P: Provisioner> ScimMetadataManager for StandardResourceHandler<S, P> {
    fn managed_resource_type(&self) -> &ResourceType {
        &self.config.resource_type
    }
}

/// Split a client payload into a resource with the given id. Server-managed
/// keys are dropped and nulls pruned.
fn from_payload(id: String, mut attributes: Attributes) -> Resource {
    attributes.remove("id");
    attributes.remove("meta");
    let external_id = match attributes.remove("externalId") {
        Some(Value::String(external_id)) => Some(external_id),
        _ => None,
    };
    prune_nulls(&mut attributes);

    Resource {
        id,
        external_id,
        attributes,
        meta: Meta::default(),
    }
}

fn payload_for_log(value: &Attributes) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "invalid json".to_string())
}

impl<S: DocumentStore, P: Provisioner> ResourceHandler for StandardResourceHandler<S, P> {
    async fn create(&self, attributes: Attributes) -> ScimResult<Resource> {
        info!("Creating {} resource", self.resource_type_name());
        trace!("Create data: {}", payload_for_log(&attributes));

        let mut resource = from_payload(Uuid::new_v4().to_string(), attributes);
        self.add_creation_metadata(&mut resource, Utc::now());

        if let Some(provisioner) = &self.provisioner {
            let body = resource.provisioning_body();
            let provisioned = self
                .bounded_forward(provisioner.forward_create(&body))
                .await
                .map_err(|e| ScimError::forward(ForwardPhase::Create, e))?;
            if provisioned.id != resource.id {
                warn!(
                    "Provisioning target assigned id '{}' to {} '{}'",
                    provisioned.id,
                    self.resource_type_name(),
                    resource.id
                );
            }
            resource.external_id = Some(provisioned.external_id);
        }

        let document = self.finalize_with_content_version(&mut resource);
        if let Err(e) = self
            .bounded_store("insert", self.store.insert(document))
            .await
        {
            self.forward_delete_best_effort(&resource.id).await;
            return Err(e);
        }

        info!(
            "Created {} resource with id '{}'",
            self.resource_type_name(),
            resource.id
        );
        Ok(resource)
    }

    async fn get(&self, id: &str) -> ScimResult<Resource> {
        debug!("Getting {} resource '{}'", self.resource_type_name(), id);
        self.find_existing(id).await.map(to_resource)
    }

    async fn get_all(&self, params: &ListRequestParams) -> ScimResult<Page<Resource>> {
        debug!(
            "Listing {} resources (startIndex: {}, count: {})",
            self.resource_type_name(),
            params.start_index,
            params.count
        );

        let documents = self.bounded_store("list", self.store.list_all()).await?;
        if documents.is_empty() {
            return Ok(Page::empty());
        }
        Ok(paginate(documents, params).map(to_resource))
    }

    async fn replace(&self, id: &str, attributes: Attributes) -> ScimResult<Resource> {
        info!("Replacing {} resource '{}'", self.resource_type_name(), id);
        trace!("Replace data: {}", payload_for_log(&attributes));

        let existing = to_resource(self.find_existing(id).await?);
        let mut resource = from_payload(id.to_string(), attributes);
        let document = self.update_modification_metadata(
            &mut resource,
            &existing.meta,
            REPLACE_VERSION_SUFFIX,
            Utc::now(),
        );

        self.bounded_store("delete", self.store.delete_by_id(id)).await?;
        self.bounded_store("insert", self.store.insert(document)).await?;
        self.forward_update_best_effort(&resource).await;

        info!(
            "Replaced {} resource '{}' (version {})",
            self.resource_type_name(),
            id,
            resource.meta.version
        );
        Ok(resource)
    }

    async fn delete(&self, id: &str) -> ScimResult<()> {
        info!("Deleting {} resource '{}'", self.resource_type_name(), id);

        self.find_existing(id).await?;
        self.bounded_store("delete", self.store.delete_by_id(id)).await?;
        self.forward_delete_best_effort(id).await;

        info!("Deleted {} resource '{}'", self.resource_type_name(), id);
        Ok(())
    }

    async fn patch(&self, id: &str, operations: &[PatchOperation]) -> ScimResult<Resource> {
        info!(
            "Patching {} resource '{}' with {} operation(s)",
            self.resource_type_name(),
            id,
            operations.len()
        );

        let existing = to_resource(self.find_existing(id).await?);
        let mut tree = existing.attributes;
        if let Some(external_id) = existing.external_id {
            tree.insert("externalId".to_string(), Value::String(external_id));
        }
        apply_operations(&mut tree, operations)?;
        trace!("Patched data: {}", payload_for_log(&tree));

        tree.insert("id".to_string(), Value::String(id.to_string()));
        let mut resource = to_resource(tree);
        let document = self.update_modification_metadata(
            &mut resource,
            &existing.meta,
            PATCH_VERSION_SUFFIX,
            Utc::now(),
        );

        self.bounded_store("delete", self.store.delete_by_id(id)).await?;
        self.bounded_store("insert", self.store.insert(document)).await?;
        self.forward_update_best_effort(&resource).await;

        info!(
            "Patched {} resource '{}' (version {})",
            self.resource_type_name(),
            id,
            resource.meta.version
        );
        Ok(resource)
    }
}
