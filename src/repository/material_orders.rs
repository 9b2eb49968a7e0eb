//! Material order repository

use chrono::Utc;
use serde_json::json;

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    live::LiveViewBuilder,
    models::enums::OrderStatus,
    models::material_order::MaterialOrder,
    models::user::UserContext,
    store::{collections, to_document, DocId, Document, Filter, SharedStore},
};

#[derive(Clone)]
pub struct MaterialOrdersRepository {
    store: SharedStore,
}

impl MaterialOrdersRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a material order document
    pub async fn create(&self, order: &MaterialOrder) -> AppResult<DocId> {
        let mut fields = to_document(order)?;
        stamp_create(&mut fields);
        let id = self
            .store
            .insert(collections::MATERIAL_ORDERS, fields)
            .await?;
        Ok(id)
    }

    /// Get a material order by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<MaterialOrder>> {
        let doc = self
            .store
            .get(collections::MATERIAL_ORDERS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material order {} not found", id)))?;
        super::decode(collections::MATERIAL_ORDERS, doc)
            .ok_or_else(|| AppError::Internal(format!("Material order {} is malformed", id)))
    }

    /// List all material orders, newest first
    pub async fn list(&self) -> AppResult<Vec<Doc<MaterialOrder>>> {
        let snapshot = self
            .store
            .list(collections::MATERIAL_ORDERS, Filter::all())
            .await?;
        let mut docs: Vec<Doc<MaterialOrder>> =
            decode_snapshot(collections::MATERIAL_ORDERS, snapshot);
        docs.sort_by(|a, b| b.data.requested_at.cmp(&a.data.requested_at));
        Ok(docs)
    }

    /// Live view over all material orders, newest first
    pub fn watch(&self) -> LiveViewBuilder<MaterialOrder> {
        LiveViewBuilder::<MaterialOrder>::new(self.store.clone(), collections::MATERIAL_ORDERS)
            .sorted_by(|a, b| b.data.requested_at.cmp(&a.data.requested_at))
    }

    pub async fn mark_approved(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(OrderStatus::Approved));
        patch.insert("approvedAt".to_string(), json!(Utc::now()));
        patch.insert("approvedBy".to_string(), json!(by.name));
        patch.insert("approvedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store
            .update(collections::MATERIAL_ORDERS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_rejected(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(OrderStatus::Rejected));
        patch.insert("rejectedAt".to_string(), json!(Utc::now()));
        patch.insert("rejectedBy".to_string(), json!(by.name));
        patch.insert("rejectedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store
            .update(collections::MATERIAL_ORDERS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_purchased(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(OrderStatus::Purchased));
        patch.insert("purchasedAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store
            .update(collections::MATERIAL_ORDERS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_delivered(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(OrderStatus::Delivered));
        patch.insert("deliveredAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store
            .update(collections::MATERIAL_ORDERS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_cancelled(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(OrderStatus::Cancelled));
        patch.insert("cancelledAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store
            .update(collections::MATERIAL_ORDERS, id, patch)
            .await?;
        Ok(())
    }

    /// Delete a material order
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::MATERIAL_ORDERS, id).await?;
        Ok(())
    }
}
