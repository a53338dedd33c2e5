//! Shared fixtures for the integration tests.
//!
//! Provides attribute builders, a store wrapper that can be told to fail and a
//! provisioner that records every forwarded call.

#![allow(dead_code)]

use scim_provisioner::config::HandlerConfig;
use scim_provisioner::providers::StandardResourceHandler;
use scim_provisioner::provisioning::{ForwardError, ProvisionedIds, Provisioner};
use scim_provisioner::resource::Attributes;
use scim_provisioner::storage::{Document, DocumentStore, InMemoryDocumentStore, StoreError};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install a test logger once. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Convert a JSON object literal into attributes.
pub fn attrs(value: Value) -> Attributes {
    value.as_object().cloned().expect("fixture must be a JSON object")
}

pub fn user_attributes(username: &str) -> Attributes {
    attrs(json!({
        "userName": username,
        "displayName": format!("User {}", username),
        "active": true
    }))
}

/// Handler over a fresh in-memory store with forwarding disabled.
pub fn local_handler() -> StandardResourceHandler<InMemoryDocumentStore> {
    StandardResourceHandler::new(InMemoryDocumentStore::new(), HandlerConfig::default())
        .expect("handler without provisioning always builds")
}

/// Handler over a fresh in-memory store forwarding to `provisioner`.
pub fn recording_handler(
    provisioner: RecordingProvisioner,
) -> StandardResourceHandler<InMemoryDocumentStore, RecordingProvisioner> {
    StandardResourceHandler::with_provisioner(
        InMemoryDocumentStore::new(),
        HandlerConfig::default(),
        Some(provisioner),
    )
}

/// In-memory store whose operations can be made to fail or stall.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryDocumentStore,
    fail_inserts: Arc<AtomicBool>,
    stall_reads: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn stall_reads(&self, stall: bool) {
        self.stall_reads.store(stall, Ordering::SeqCst);
    }
}

impl DocumentStore for FlakyStore {
    type Error = StoreError;

    async fn insert(&self, document: Document) -> Result<(), Self::Error> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("insert rejected"));
        }
        self.inner.insert(document).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, Self::Error> {
        if self.stall_reads.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.find_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Document>, Self::Error> {
        self.inner.list_all().await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Self::Error> {
        self.inner.delete_by_id(id).await
    }
}

/// A call received by [`RecordingProvisioner`].
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardCall {
    Create(Value),
    Update(String, Value),
    Delete(String),
}

/// Provisioner that records calls instead of sending them.
///
/// Creates succeed with `externalId` set to `ext-<id>` unless told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvisioner {
    calls: Arc<Mutex<Vec<ForwardCall>>>,
    fail_creates: bool,
    fail_updates: bool,
}

impl RecordingProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_creates() -> Self {
        Self {
            fail_creates: true,
            ..Self::default()
        }
    }

    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ForwardCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ForwardCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejection() -> ForwardError {
        ForwardError::UnexpectedStatus {
            status: 503,
            body: "provisioning target unavailable".to_string(),
        }
    }
}

impl Provisioner for RecordingProvisioner {
    async fn forward_create(&self, body: &Value) -> Result<ProvisionedIds, ForwardError> {
        self.record(ForwardCall::Create(body.clone()));
        if self.fail_creates {
            return Err(Self::rejection());
        }
        let id = body["id"].as_str().unwrap_or_default().to_string();
        Ok(ProvisionedIds {
            external_id: format!("ext-{}", id),
            id,
        })
    }

    async fn forward_update(&self, id: &str, body: &Value) -> Result<(), ForwardError> {
        self.record(ForwardCall::Update(id.to_string(), body.clone()));
        if self.fail_updates {
            return Err(Self::rejection());
        }
        Ok(())
    }

    async fn forward_delete(&self, id: &str) -> Result<(), ForwardError> {
        self.record(ForwardCall::Delete(id.to_string()));
        if self.fail_updates {
            return Err(Self::rejection());
        }
        Ok(())
    }
}
