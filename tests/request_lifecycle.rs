mod common;

use anyhow::Result;
use common::{admin, member, setup, setup_with};
use leihwerk::config::LendingConfig;
use leihwerk::error::AppError;
use leihwerk::models::enums::{Category, EquipmentStatus, RequestStatus};
use leihwerk::models::equipment::CreateEquipment;
use leihwerk::models::request::SubmitEquipmentRequest;
use leihwerk::store::{collections, DocId, Document};
use leihwerk::AppState;

async fn add_equipment(state: &AppState, name: &str, requires_deposit: bool) -> Result<DocId> {
    let id = state
        .services
        .equipment
        .create(CreateEquipment {
            name: name.to_string(),
            category: Category::Hardware,
            location: Some("Shelf 3".to_string()),
            description: None,
            requires_deposit,
            deposit_amount: requires_deposit.then_some(50.0),
        })
        .await?;
    Ok(id)
}

async fn submit_request(state: &AppState, equipment_id: &DocId) -> Result<DocId> {
    let id = state
        .services
        .requests
        .submit(
            SubmitEquipmentRequest {
                equipment_id: equipment_id.to_string(),
                duration: Some("2 weeks".to_string()),
                purpose: Some("Workshop build".to_string()),
            },
            &member(),
        )
        .await?;
    Ok(id)
}

#[tokio::test]
async fn test_full_lending_cycle() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Cordless Drill", true).await?;
    let request_id = submit_request(&state, &equipment_id).await?;

    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Pending);
    assert_eq!(request.data.equipment_name.as_deref(), Some("Cordless Drill"));
    assert!(request.data.requested_at.is_some());

    state.services.requests.approve(&request_id, &admin()).await?;
    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Approved);
    assert_eq!(request.data.approved_by_kennung.as_deref(), Some("zz99admn"));

    state.services.requests.give(&request_id, &admin()).await?;
    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Given);
    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Rented);
    assert_eq!(equipment.data.borrower(), Some("ab12cdef"));
    assert!(equipment.data.deposit_paid);

    state.services.requests.request_return(&request_id).await?;
    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::ReturnRequested);

    state
        .services
        .requests
        .confirm_return(&request_id, &admin())
        .await?;
    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Returned);
    assert_eq!(request.data.returned_by_kennung.as_deref(), Some("zz99admn"));
    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Available);
    assert_eq!(equipment.data.borrower(), None);
    assert!(!equipment.data.deposit_paid);
    Ok(())
}

#[tokio::test]
async fn test_active_requests_from_earlier_builds_can_be_returned() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Multimeter", false).await?;

    // Handed-over requests were stored as `active` before the rename to
    // `given`.
    let mut legacy = Document::new();
    legacy.insert("type".to_string(), serde_json::json!("equipment"));
    legacy.insert("status".to_string(), serde_json::json!("active"));
    legacy.insert(
        "equipmentId".to_string(),
        serde_json::json!(equipment_id.to_string()),
    );
    legacy.insert("userKennung".to_string(), serde_json::json!("ab12cdef"));
    let request_id = state
        .repository
        .store
        .insert(collections::REQUESTS, legacy)
        .await?;

    state.services.requests.request_return(&request_id).await?;

    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::ReturnRequested);
    assert!(request.data.return_requested_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_approve_leaves_equipment_untouched() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Laser Cutter Key", false).await?;
    let request_id = submit_request(&state, &equipment_id).await?;

    state.services.requests.approve(&request_id, &admin()).await?;

    // The item is only blocked at handover, not at approval.
    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Available);
    assert_eq!(equipment.data.borrower(), None);
    Ok(())
}

#[tokio::test]
async fn test_reserve_on_approve_blocks_equipment() -> Result<()> {
    let state = setup_with(LendingConfig {
        reserve_on_approve: true,
        ..Default::default()
    });
    let equipment_id = add_equipment(&state, "Thermal Camera", true).await?;
    let request_id = submit_request(&state, &equipment_id).await?;

    state.services.requests.approve(&request_id, &admin()).await?;

    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Rented);
    assert_eq!(equipment.data.borrower(), Some("ab12cdef"));
    // The deposit is still collected at handover.
    assert!(!equipment.data.deposit_paid);
    Ok(())
}

#[tokio::test]
async fn test_give_requires_prior_approval() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Soldering Station", false).await?;
    let request_id = submit_request(&state, &equipment_id).await?;

    let err = state
        .services
        .requests
        .give(&request_id, &admin())
        .await
        .unwrap_err();
    match err {
        AppError::InvalidTransition { action, from } => {
            assert_eq!(action, "give");
            assert_eq!(from, "pending");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing moved.
    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Pending);
    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Available);
    Ok(())
}

#[tokio::test]
async fn test_reject_closes_the_request() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Vinyl Plotter", false).await?;
    let request_id = submit_request(&state, &equipment_id).await?;

    state.services.requests.reject(&request_id, &admin()).await?;

    let request = state.services.requests.get(&request_id).await?;
    assert_eq!(request.data.status, RequestStatus::Rejected);
    assert_eq!(request.data.rejected_by.as_deref(), Some("Jonas Reinhardt"));

    // A rejected request cannot be approved after the fact.
    let err = state
        .services
        .requests
        .approve(&request_id, &admin())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    Ok(())
}

#[tokio::test]
async fn test_single_open_request_policy() -> Result<()> {
    let state = setup_with(LendingConfig {
        allow_multiple_pending_per_asset: false,
        ..Default::default()
    });
    let equipment_id = add_equipment(&state, "Oscilloscope", false).await?;
    submit_request(&state, &equipment_id).await?;

    let err = submit_request(&state, &equipment_id).await.unwrap_err();
    let err = err.downcast::<AppError>()?;
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn test_multiple_pending_requests_by_default() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Heat Press", false).await?;
    submit_request(&state, &equipment_id).await?;
    submit_request(&state, &equipment_id).await?;

    let requests = state.services.requests.list().await?;
    assert_eq!(requests.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_delete_given_request_frees_the_equipment() -> Result<()> {
    let state = setup();
    let equipment_id = add_equipment(&state, "Projector", false).await?;
    let request_id = submit_request(&state, &equipment_id).await?;
    state.services.requests.approve(&request_id, &admin()).await?;
    state.services.requests.give(&request_id, &admin()).await?;

    state.services.requests.delete(&request_id).await?;

    let err = state.services.requests.get(&request_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let equipment = state.services.equipment.get(&equipment_id).await?;
    assert_eq!(equipment.data.status, EquipmentStatus::Available);
    assert_eq!(equipment.data.borrower(), None);
    Ok(())
}

#[tokio::test]
async fn test_submit_for_unknown_equipment_fails() -> Result<()> {
    let state = setup();
    let err = state
        .services
        .requests
        .submit(
            SubmitEquipmentRequest {
                equipment_id: "no-such-id".to_string(),
                duration: None,
                purpose: None,
            },
            &member(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_requests_listed_newest_first() -> Result<()> {
    let state = setup();
    let first = add_equipment(&state, "Bandsaw", false).await?;
    let second = add_equipment(&state, "Router Table", false).await?;
    submit_request(&state, &first).await?;
    // Keep the requestedAt stamps strictly ordered.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    submit_request(&state, &second).await?;

    let requests = state.services.requests.list().await?;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].data.equipment_name.as_deref(), Some("Router Table"));
    assert_eq!(requests[1].data.equipment_name.as_deref(), Some("Bandsaw"));

    let mine = state.services.requests.list_for_user("ab12cdef").await?;
    assert_eq!(mine.len(), 2);
    assert!(state.services.requests.list_for_user("xx00none").await?.is_empty());
    Ok(())
}
