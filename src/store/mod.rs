//! Document store abstraction
//!
//! The dashboard's data lives in a hosted, schemaless document database.
//! This module defines the minimal contract the rest of the crate relies
//! on: per-collection CRUD plus a subscribe-for-changes primitive that
//! always delivers the complete current matching set (never deltas).
//! [`memory::MemoryStore`] is the in-process implementation used for local
//! operation and tests.

pub mod filter;
pub mod memory;

pub use filter::{Condition, Filter};
pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Collection names, the wire contract shared with already-stored data.
pub mod collections {
    pub const EQUIPMENT: &str = "equipment";
    pub const PRINTERS: &str = "printers";
    pub const REQUESTS: &str = "requests";
    pub const MATERIAL_ORDERS: &str = "materialOrders";
    pub const PROBLEM_REPORTS: &str = "problemReports";
    pub const USERS: &str = "users";
}

/// A schemaless document: a JSON object with wire-format field names.
pub type Document = serde_json::Map<String, Value>;

/// Opaque document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        DocId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

/// A document together with its id, as returned by reads and snapshots.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: DocId,
    pub fields: Document,
}

/// Full current result set of a subscribed query.
pub type Snapshot = Vec<StoredDocument>;

/// Callback receiving the complete current matching set on every change.
pub type SnapshotCallback = Box<dyn Fn(Snapshot) + Send + Sync>;

/// Errors raised by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: DocId },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// RAII handle for a live subscription.
///
/// Dropping the guard (or calling [`ListenerGuard::close`]) unsubscribes;
/// once that returns, no further callback fires for the subscription. The
/// guard must not be dropped from inside a listener callback.
pub struct ListenerGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        ListenerGuard {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly unsubscribe. Equivalent to dropping the guard.
    pub fn close(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Contract every store backend implements.
///
/// Writes resolve once the backend acknowledges them; there is no retry
/// and no timeout. Subscriptions deliver an initial callback with the full
/// current matching set before `subscribe` returns, then one callback per
/// committed change touching the collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<DocId>;

    async fn get(&self, collection: &str, id: &DocId) -> StoreResult<Option<StoredDocument>>;

    async fn list(&self, collection: &str, filter: Filter) -> StoreResult<Snapshot>;

    /// Merge-patch the document: top-level `null` values remove the field,
    /// everything else is set. Fails with [`StoreError::NotFound`] when the
    /// id is absent.
    async fn update(&self, collection: &str, id: &DocId, patch: Document) -> StoreResult<()>;

    /// Deleting an absent document is a no-op success, mirroring the hosted
    /// backend's semantics.
    async fn delete(&self, collection: &str, id: &DocId) -> StoreResult<()>;

    async fn subscribe(
        &self,
        collection: &str,
        filter: Filter,
        callback: SnapshotCallback,
    ) -> StoreResult<ListenerGuard>;
}

/// Shared handle to a store backend.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Serialize a typed model into a raw document.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!(
            "expected a JSON object, got {}",
            value_kind(&other)
        ))),
    }
}

/// Deserialize a raw document into a typed model.
pub fn from_document<T: DeserializeOwned>(fields: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
