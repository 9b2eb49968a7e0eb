//! Equipment request lifecycle service

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::enums::{RequestAction, RequestStatus, RequestType},
    models::request::{EquipmentRequest, SubmitEquipmentRequest},
    models::user::UserContext,
    repository::{Doc, Repository},
    store::DocId,
};

fn ensure(status: RequestStatus, action: RequestAction) -> AppResult<()> {
    match status.next(action) {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_transition(action.as_str(), status.as_str())),
    }
}

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    lending: LendingConfig,
}

impl RequestsService {
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self { repository, lending }
    }

    /// Submit a new equipment request on behalf of the signed-in user
    pub async fn submit(
        &self,
        data: SubmitEquipmentRequest,
        ctx: &UserContext,
    ) -> AppResult<DocId> {
        data.validate()?;

        // Verify the equipment exists and pick up its name for display
        let equipment_id = DocId::from(data.equipment_id.as_str());
        let equipment = self.repository.equipment.get(&equipment_id).await?;

        if !self.lending.allow_multiple_pending_per_asset {
            let open = self
                .repository
                .requests
                .open_for_equipment(&data.equipment_id)
                .await?;
            if !open.is_empty() {
                return Err(AppError::Conflict(format!(
                    "Equipment '{}' already has an open request",
                    equipment.data.name
                )));
            }
        }

        let request = EquipmentRequest {
            request_type: RequestType::Equipment,
            equipment_id: data.equipment_id,
            equipment_name: Some(equipment.data.name),
            user_kennung: ctx.kennung.clone(),
            user_name: Some(ctx.name.clone()),
            status: RequestStatus::Pending,
            duration: data.duration,
            purpose: data.purpose,
            requested_at: Some(Utc::now()),
            ..Default::default()
        };
        let id = self.repository.requests.create(&request).await?;
        info!(request = %id, equipment = %equipment_id, user = %ctx.kennung, "request submitted");
        Ok(id)
    }

    /// Get a request by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<EquipmentRequest>> {
        self.repository.requests.get(id).await
    }

    /// List all equipment requests, newest first
    pub async fn list(&self) -> AppResult<Vec<Doc<EquipmentRequest>>> {
        self.repository.requests.list().await
    }

    /// List the signed-in user's requests, newest first
    pub async fn list_for_user(&self, kennung: &str) -> AppResult<Vec<Doc<EquipmentRequest>>> {
        self.repository.requests.list_for_user(kennung).await
    }

    /// Approve a pending request
    pub async fn approve(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        ensure(request.data.status, RequestAction::Approve)?;
        self.repository.requests.mark_approved(id, ctx).await?;

        if self.lending.reserve_on_approve {
            // Reservation mode: the item is blocked as soon as the request
            // is approved instead of at handover. Deposit is still
            // collected at handover.
            let equipment_id = DocId::from(request.data.equipment_id.as_str());
            if let Err(err) = self
                .repository
                .equipment
                .mark_rented(&equipment_id, &request.data.user_kennung, false)
                .await
            {
                warn!(request = %id, equipment = %equipment_id, %err,
                    "equipment update after approve failed, statuses out of sync until retried");
            }
        }
        Ok(())
    }

    /// Reject a pending request
    pub async fn reject(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        ensure(request.data.status, RequestAction::Reject)?;
        self.repository.requests.mark_rejected(id, ctx).await
    }

    /// Hand the equipment over to the requester.
    ///
    /// Writes the request first, then the equipment; if the equipment
    /// write fails the request still counts as given and the mismatch is
    /// logged for a later retry of the equipment side.
    pub async fn give(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        ensure(request.data.status, RequestAction::Give)?;
        self.repository.requests.mark_given(id, ctx).await?;

        let equipment_id = DocId::from(request.data.equipment_id.as_str());
        match self.repository.equipment.get(&equipment_id).await {
            Ok(equipment) => {
                let deposit_paid = equipment.data.requires_deposit;
                if let Err(err) = self
                    .repository
                    .equipment
                    .mark_rented(&equipment_id, &request.data.user_kennung, deposit_paid)
                    .await
                {
                    warn!(request = %id, equipment = %equipment_id, %err,
                        "equipment update after give failed, item not marked rented");
                }
            }
            Err(err) => {
                warn!(request = %id, equipment = %equipment_id, %err,
                    "equipment lookup after give failed, item not marked rented");
            }
        }
        info!(request = %id, equipment = %equipment_id, user = %request.data.user_kennung,
            "equipment handed over");
        Ok(())
    }

    /// The requester asks to hand the equipment back
    pub async fn request_return(&self, id: &DocId) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        ensure(request.data.status, RequestAction::RequestReturn)?;
        self.repository.requests.mark_return_requested(id).await
    }

    /// An admin confirms the equipment came back
    pub async fn confirm_return(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        ensure(request.data.status, RequestAction::ConfirmReturn)?;
        self.repository.requests.mark_returned(id, ctx).await?;

        let equipment_id = DocId::from(request.data.equipment_id.as_str());
        if let Err(err) = self.repository.equipment.mark_available(&equipment_id).await {
            warn!(request = %id, equipment = %equipment_id, %err,
                "equipment reset after return failed, item still marked rented");
        }
        info!(request = %id, equipment = %equipment_id, "equipment returned");
        Ok(())
    }

    /// Delete a request. When the request still holds the equipment, the
    /// item is handed back as part of the cleanup.
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        let request = self.repository.requests.get(id).await?;
        self.repository.requests.delete(id).await?;

        if request.data.status.holds_equipment() {
            let equipment_id = DocId::from(request.data.equipment_id.as_str());
            if let Err(err) = self.repository.equipment.mark_available(&equipment_id).await {
                warn!(request = %id, equipment = %equipment_id, %err,
                    "equipment reset after delete failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        Document, MockDocumentStore, StoreError, StoredDocument,
    };
    use mockall::Sequence;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn fields(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    fn request_fields(status: &str) -> Document {
        fields(json!({
            "type": "equipment",
            "equipmentId": "eq-1",
            "equipmentName": "Drill",
            "userKennung": "ab12cdef",
            "status": status,
        }))
    }

    fn equipment_fields(status: &str) -> Document {
        fields(json!({
            "name": "Drill",
            "category": "hardware",
            "status": status,
            "requiresDeposit": true,
        }))
    }

    fn service(store: MockDocumentStore, lending: LendingConfig) -> RequestsService {
        RequestsService::new(Repository::new(Arc::new(store)), lending)
    }

    #[tokio::test]
    async fn test_give_updates_request_before_equipment() {
        let mut store = MockDocumentStore::new();
        let mut seq = Sequence::new();

        store
            .expect_get()
            .withf(|collection, _| collection == "requests")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: request_fields("approved"),
                }))
            });
        store
            .expect_update()
            .withf(|collection, _, patch| {
                collection == "requests"
                    && patch.get("status") == Some(&json!("given"))
                    && patch.get("givenByKennung") == Some(&json!("zz99admn"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        store
            .expect_get()
            .withf(|collection, _| collection == "equipment")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: equipment_fields("available"),
                }))
            });
        store
            .expect_update()
            .withf(|collection, _, patch| {
                collection == "equipment"
                    && patch.get("status") == Some(&json!("rented"))
                    && patch.get("rentedByKennung") == Some(&json!("ab12cdef"))
                    && patch.get("depositPaid") == Some(&json!(true))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let service = service(store, LendingConfig::default());
        let admin = UserContext::new("Admin", "zz99admn", true);
        service.give(&DocId::new("req-1"), &admin).await.unwrap();
    }

    #[tokio::test]
    async fn test_give_from_pending_is_rejected_before_any_write() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .withf(|collection, _| collection == "requests")
            .times(1)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: request_fields("pending"),
                }))
            });

        let service = service(store, LendingConfig::default());
        let admin = UserContext::new("Admin", "zz99admn", true);
        let err = service.give(&DocId::new("req-1"), &admin).await.unwrap_err();
        match err {
            AppError::InvalidTransition { action, from } => {
                assert_eq!(action, "give");
                assert_eq!(from, "pending");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirm_return_succeeds_when_equipment_write_fails() {
        let mut store = MockDocumentStore::new();
        let mut seq = Sequence::new();

        store
            .expect_get()
            .withf(|collection, _| collection == "requests")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: request_fields("return_requested"),
                }))
            });
        store
            .expect_update()
            .withf(|collection, _, patch| {
                collection == "requests" && patch.get("status") == Some(&json!("returned"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        store
            .expect_update()
            .withf(|collection, _, _| collection == "equipment")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(StoreError::Unavailable("backend offline".to_string())));

        let service = service(store, LendingConfig::default());
        let admin = UserContext::new("Admin", "zz99admn", true);
        service
            .confirm_return(&DocId::new("req-1"), &admin)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_conflicts_when_single_request_policy_active() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .withf(|collection, _| collection == "equipment")
            .times(1)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: equipment_fields("available"),
                }))
            });
        store
            .expect_list()
            .withf(|collection, _| collection == "requests")
            .times(1)
            .returning(|_, _| {
                Ok(vec![StoredDocument {
                    id: DocId::new("req-0"),
                    fields: request_fields("pending"),
                }])
            });

        let lending = LendingConfig {
            allow_multiple_pending_per_asset: false,
            ..Default::default()
        };
        let service = service(store, lending);
        let user = UserContext::new("Mara Vogel", "ab12cdef", false);
        let data = SubmitEquipmentRequest {
            equipment_id: "eq-1".to_string(),
            duration: Some("2 weeks".to_string()),
            purpose: None,
        };
        let err = service.submit(data, &user).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_approve_reserves_equipment_when_configured() {
        let mut store = MockDocumentStore::new();
        let mut seq = Sequence::new();

        store
            .expect_get()
            .withf(|collection, _| collection == "requests")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id| {
                Ok(Some(StoredDocument {
                    id: id.clone(),
                    fields: request_fields("pending"),
                }))
            });
        store
            .expect_update()
            .withf(|collection, _, patch| {
                collection == "requests" && patch.get("status") == Some(&json!("approved"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        store
            .expect_update()
            .withf(|collection, _, patch| {
                collection == "equipment"
                    && patch.get("status") == Some(&json!("rented"))
                    && patch.get("rentedByKennung") == Some(&json!("ab12cdef"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let lending = LendingConfig {
            reserve_on_approve: true,
            ..Default::default()
        };
        let service = service(store, lending);
        let admin = UserContext::new("Admin", "zz99admn", true);
        service.approve(&DocId::new("req-1"), &admin).await.unwrap();
    }
}
