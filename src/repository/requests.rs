//! Equipment request repository

use chrono::Utc;
use serde_json::json;

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    live::LiveViewBuilder,
    models::enums::{RequestStatus, RequestType},
    models::request::EquipmentRequest,
    models::user::UserContext,
    store::{collections, to_document, DocId, Document, Filter, SharedStore},
};

/// Filter matching the equipment slice of the shared `requests` collection.
pub fn equipment_requests() -> Filter {
    Filter::new().field_eq("type", RequestType::Equipment.as_str())
}

#[derive(Clone)]
pub struct RequestsRepository {
    store: SharedStore,
}

impl RequestsRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a request document
    pub async fn create(&self, request: &EquipmentRequest) -> AppResult<DocId> {
        let mut fields = to_document(request)?;
        stamp_create(&mut fields);
        let id = self.store.insert(collections::REQUESTS, fields).await?;
        Ok(id)
    }

    /// Get a request by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<EquipmentRequest>> {
        let doc = self
            .store
            .get(collections::REQUESTS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;
        super::decode(collections::REQUESTS, doc)
            .ok_or_else(|| AppError::Internal(format!("Request {} is malformed", id)))
    }

    /// List all equipment requests, newest first.
    ///
    /// The sort runs here rather than in the store query: ordering a
    /// filtered query server-side would need a composite index on
    /// (`type`, `requestedAt`), which the deployed store does not have.
    pub async fn list(&self) -> AppResult<Vec<Doc<EquipmentRequest>>> {
        let snapshot = self
            .store
            .list(collections::REQUESTS, equipment_requests())
            .await?;
        let mut docs: Vec<Doc<EquipmentRequest>> =
            decode_snapshot(collections::REQUESTS, snapshot);
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    /// List one user's equipment requests, newest first
    pub async fn list_for_user(&self, kennung: &str) -> AppResult<Vec<Doc<EquipmentRequest>>> {
        let filter = equipment_requests().field_eq("userKennung", kennung);
        let snapshot = self.store.list(collections::REQUESTS, filter).await?;
        let mut docs: Vec<Doc<EquipmentRequest>> =
            decode_snapshot(collections::REQUESTS, snapshot);
        sort_newest_first(&mut docs);
        Ok(docs)
    }

    /// Live view over all equipment requests, newest first
    pub fn watch(&self) -> LiveViewBuilder<EquipmentRequest> {
        LiveViewBuilder::<EquipmentRequest>::new(self.store.clone(), collections::REQUESTS)
            .filter(equipment_requests())
            .sorted_by(|a, b| b.data.requested_at.cmp(&a.data.requested_at))
    }

    /// Live view over one user's equipment requests, newest first
    pub fn watch_for_user(&self, kennung: &str) -> LiveViewBuilder<EquipmentRequest> {
        LiveViewBuilder::<EquipmentRequest>::new(self.store.clone(), collections::REQUESTS)
            .filter(equipment_requests().field_eq("userKennung", kennung))
            .sorted_by(|a, b| b.data.requested_at.cmp(&a.data.requested_at))
    }

    /// Requests still counting against one equipment item
    pub async fn open_for_equipment(
        &self,
        equipment_id: &str,
    ) -> AppResult<Vec<Doc<EquipmentRequest>>> {
        let filter = equipment_requests().field_eq("equipmentId", equipment_id);
        let snapshot = self.store.list(collections::REQUESTS, filter).await?;
        let docs: Vec<Doc<EquipmentRequest>> = decode_snapshot(collections::REQUESTS, snapshot);
        Ok(docs
            .into_iter()
            .filter(|doc| doc.data.status.is_open())
            .collect())
    }

    pub async fn mark_approved(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(RequestStatus::Approved));
        patch.insert("approvedAt".to_string(), json!(Utc::now()));
        patch.insert("approvedBy".to_string(), json!(by.name));
        patch.insert("approvedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store.update(collections::REQUESTS, id, patch).await?;
        Ok(())
    }

    pub async fn mark_rejected(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(RequestStatus::Rejected));
        patch.insert("rejectedAt".to_string(), json!(Utc::now()));
        patch.insert("rejectedBy".to_string(), json!(by.name));
        patch.insert("rejectedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store.update(collections::REQUESTS, id, patch).await?;
        Ok(())
    }

    pub async fn mark_given(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(RequestStatus::Given));
        patch.insert("givenAt".to_string(), json!(Utc::now()));
        patch.insert("givenBy".to_string(), json!(by.name));
        patch.insert("givenByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store.update(collections::REQUESTS, id, patch).await?;
        Ok(())
    }

    pub async fn mark_return_requested(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(RequestStatus::ReturnRequested));
        patch.insert("returnRequestedAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store.update(collections::REQUESTS, id, patch).await?;
        Ok(())
    }

    pub async fn mark_returned(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(RequestStatus::Returned));
        patch.insert("returnedAt".to_string(), json!(Utc::now()));
        patch.insert("returnedBy".to_string(), json!(by.name));
        patch.insert("returnedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store.update(collections::REQUESTS, id, patch).await?;
        Ok(())
    }

    /// Delete a request
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::REQUESTS, id).await?;
        Ok(())
    }
}

/// Sort by `requestedAt` descending; documents without the stamp go last.
pub fn sort_newest_first(docs: &mut [Doc<EquipmentRequest>]) {
    docs.sort_by(|a, b| b.data.requested_at.cmp(&a.data.requested_at));
}
