//! Equipment repository

use serde_json::{json, Value};

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    live::LiveViewBuilder,
    models::equipment::{Equipment, UpdateEquipment},
    models::enums::EquipmentStatus,
    store::{collections, to_document, DocId, Document, Filter, SharedStore},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    store: SharedStore,
}

impl EquipmentRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create an equipment document
    pub async fn create(&self, equipment: &Equipment) -> AppResult<DocId> {
        let mut fields = to_document(equipment)?;
        stamp_create(&mut fields);
        let id = self.store.insert(collections::EQUIPMENT, fields).await?;
        Ok(id)
    }

    /// Get equipment by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<Equipment>> {
        let doc = self
            .store
            .get(collections::EQUIPMENT, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        super::decode(collections::EQUIPMENT, doc)
            .ok_or_else(|| AppError::Internal(format!("Equipment {} is malformed", id)))
    }

    /// List all equipment, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<Equipment>>> {
        let snapshot = self.store.list(collections::EQUIPMENT, Filter::all()).await?;
        let mut docs: Vec<Doc<Equipment>> = decode_snapshot(collections::EQUIPMENT, snapshot);
        docs.sort_by(|a, b| a.data.name.cmp(&b.data.name));
        Ok(docs)
    }

    /// Live view over the whole inventory, sorted by name
    pub fn watch(&self) -> LiveViewBuilder<Equipment> {
        LiveViewBuilder::<Equipment>::new(self.store.clone(), collections::EQUIPMENT)
            .sorted_by(|a, b| a.data.name.cmp(&b.data.name))
    }

    /// Apply an update payload
    pub async fn update(&self, id: &DocId, data: &UpdateEquipment) -> AppResult<()> {
        let mut patch = to_document(data)?;
        stamp_update(&mut patch);
        self.store.update(collections::EQUIPMENT, id, patch).await?;
        Ok(())
    }

    /// Set a bare status, leaving borrower fields as they are
    pub async fn set_status(&self, id: &DocId, status: EquipmentStatus) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(status));
        stamp_update(&mut patch);
        self.store.update(collections::EQUIPMENT, id, patch).await?;
        Ok(())
    }

    /// Hand the item out through the request lifecycle
    pub async fn mark_rented(
        &self,
        id: &DocId,
        kennung: &str,
        deposit_paid: bool,
    ) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(EquipmentStatus::Rented));
        patch.insert("rentedByKennung".to_string(), json!(kennung));
        patch.insert("rentedAt".to_string(), json!(chrono::Utc::now()));
        patch.insert("depositPaid".to_string(), json!(deposit_paid));
        patch.insert("borrowedBy".to_string(), Value::Null);
        patch.insert("borrowedAt".to_string(), Value::Null);
        stamp_update(&mut patch);
        self.store.update(collections::EQUIPMENT, id, patch).await?;
        Ok(())
    }

    /// Hand the item out directly, without a request
    pub async fn mark_borrowed(&self, id: &DocId, kennung: &str) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(EquipmentStatus::Borrowed));
        patch.insert("borrowedBy".to_string(), json!(kennung));
        patch.insert("borrowedAt".to_string(), json!(chrono::Utc::now()));
        patch.insert("rentedByKennung".to_string(), Value::Null);
        patch.insert("rentedAt".to_string(), Value::Null);
        stamp_update(&mut patch);
        self.store.update(collections::EQUIPMENT, id, patch).await?;
        Ok(())
    }

    /// Take the item back: clears both borrower references. Issued as a
    /// compensating write, so re-marking an available item stays a no-op.
    pub async fn mark_available(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(EquipmentStatus::Available));
        patch.insert("rentedByKennung".to_string(), Value::Null);
        patch.insert("borrowedBy".to_string(), Value::Null);
        patch.insert("rentedAt".to_string(), Value::Null);
        patch.insert("borrowedAt".to_string(), Value::Null);
        patch.insert("depositPaid".to_string(), json!(false));
        stamp_update(&mut patch);
        self.store.update(collections::EQUIPMENT, id, patch).await?;
        Ok(())
    }

    /// Delete equipment
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::EQUIPMENT, id).await?;
        Ok(())
    }
}
