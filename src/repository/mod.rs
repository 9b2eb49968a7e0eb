//! Repository layer over the document store

pub mod equipment;
pub mod material_orders;
pub mod printers;
pub mod problem_reports;
pub mod requests;
pub mod users;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::store::{DocId, Document, SharedStore, Snapshot, StoredDocument};

/// A decoded document together with its store id.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc<T> {
    pub id: DocId,
    pub data: T,
}

/// Decode one stored document into a model, or `None` (logged) when the
/// document does not fit. Collections are schemaless, so a single stray
/// document must not take a whole list down.
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, doc: StoredDocument) -> Option<Doc<T>> {
    match serde_json::from_value(Value::Object(doc.fields)) {
        Ok(data) => Some(Doc { id: doc.id, data }),
        Err(err) => {
            warn!(collection, id = %doc.id, %err, "skipping malformed document");
            None
        }
    }
}

pub(crate) fn decode_snapshot<T: DeserializeOwned>(
    collection: &str,
    snapshot: Snapshot,
) -> Vec<Doc<T>> {
    snapshot
        .into_iter()
        .filter_map(|doc| decode(collection, doc))
        .collect()
}

/// Stamp `createdAt`/`updatedAt` on a fresh document.
pub(crate) fn stamp_create(fields: &mut Document) {
    let now = serde_json::json!(Utc::now());
    fields.insert("createdAt".to_string(), now.clone());
    fields.insert("updatedAt".to_string(), now);
}

/// Stamp `updatedAt` on an update patch.
pub(crate) fn stamp_update(patch: &mut Document) {
    patch.insert("updatedAt".to_string(), serde_json::json!(Utc::now()));
}

/// Main repository struct bundling per-collection repositories
#[derive(Clone)]
pub struct Repository {
    pub store: SharedStore,
    pub equipment: equipment::EquipmentRepository,
    pub requests: requests::RequestsRepository,
    pub material_orders: material_orders::MaterialOrdersRepository,
    pub problem_reports: problem_reports::ProblemReportsRepository,
    pub printers: printers::PrintersRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository bundle over the given store client
    pub fn new(store: SharedStore) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(store.clone()),
            requests: requests::RequestsRepository::new(store.clone()),
            material_orders: material_orders::MaterialOrdersRepository::new(store.clone()),
            problem_reports: problem_reports::ProblemReportsRepository::new(store.clone()),
            printers: printers::PrintersRepository::new(store.clone()),
            users: users::UsersRepository::new(store.clone()),
            store,
        }
    }
}
