mod common;

use anyhow::Result;
use common::{admin, member, setup};
use leihwerk::error::AppError;
use leihwerk::models::enums::{OrderSource, OrderStatus, Priority};
use leihwerk::models::material_order::CreateMaterialOrder;

fn order_payload(material: &str, reason: &str) -> CreateMaterialOrder {
    CreateMaterialOrder {
        material_name: material.to_string(),
        manufacturer: Some("Prusament".to_string()),
        reason: reason.to_string(),
        quantity: 2,
        priority: Some(Priority::High),
    }
}

#[tokio::test]
async fn test_order_flows_to_delivered() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("PETG Filament", "Stock for the printer farm"), &member())
        .await?;

    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.status, OrderStatus::Pending);
    assert_eq!(order.data.source, OrderSource::User);
    assert_eq!(order.data.requested_by_kennung.as_deref(), Some("ab12cdef"));
    assert!(order.data.requested_at.is_some());

    state.services.material_orders.approve(&id, &admin()).await?;
    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.status, OrderStatus::Approved);
    assert_eq!(order.data.approved_by_kennung.as_deref(), Some("zz99admn"));

    state.services.material_orders.mark_purchased(&id).await?;
    assert_eq!(
        state.services.material_orders.get(&id).await?.data.status,
        OrderStatus::Purchased
    );

    state.services.material_orders.mark_delivered(&id).await?;
    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.status, OrderStatus::Delivered);
    assert!(order.data.delivered_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_admin_submissions_are_tagged() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Plywood 6mm", "Laser stock"), &admin())
        .await?;
    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.source, OrderSource::Admin);
    Ok(())
}

#[tokio::test]
async fn test_empty_reason_creates_nothing() -> Result<()> {
    let state = setup();
    let err = state
        .services
        .material_orders
        .submit(order_payload("Acrylic Sheet", ""), &member())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // The rejected submission never reached the store.
    assert!(state.services.material_orders.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() -> Result<()> {
    let state = setup();
    let mut payload = order_payload("Brass Inserts", "Restock");
    payload.quantity = 0;
    let err = state
        .services
        .material_orders
        .submit(payload, &member())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_delivery_straight_from_approved() -> Result<()> {
    // Small orders skip the purchased step when someone just brings the
    // material along.
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Sandpaper", "Workshop supplies"), &member())
        .await?;
    state.services.material_orders.approve(&id, &admin()).await?;
    state.services.material_orders.mark_delivered(&id).await?;
    assert_eq!(
        state.services.material_orders.get(&id).await?.data.status,
        OrderStatus::Delivered
    );
    Ok(())
}

#[tokio::test]
async fn test_pending_orders_cannot_be_purchased_or_cancelled() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Epoxy Resin", "Casting course"), &member())
        .await?;

    let err = state
        .services
        .material_orders
        .mark_purchased(&id)
        .await
        .unwrap_err();
    match err {
        AppError::InvalidTransition { action, from } => {
            assert_eq!(action, "mark purchased");
            assert_eq!(from, "pending");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = state.services.material_orders.cancel(&id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    assert_eq!(
        state.services.material_orders.get(&id).await?.data.status,
        OrderStatus::Pending
    );
    Ok(())
}

#[tokio::test]
async fn test_rejected_orders_stay_rejected() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Neon Tubing", "Sign project"), &member())
        .await?;
    state.services.material_orders.reject(&id, &admin()).await?;

    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.status, OrderStatus::Rejected);
    assert_eq!(order.data.rejected_by.as_deref(), Some("Jonas Reinhardt"));

    let err = state
        .services
        .material_orders
        .approve(&id, &admin())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    Ok(())
}

#[tokio::test]
async fn test_cancel_approved_order() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Aluminium Profile", "Frame build"), &member())
        .await?;
    state.services.material_orders.approve(&id, &admin()).await?;
    state.services.material_orders.cancel(&id).await?;

    let order = state.services.material_orders.get(&id).await?;
    assert_eq!(order.data.status, OrderStatus::Cancelled);
    assert!(order.data.cancelled_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_order_view_is_sorted_newest_first() -> Result<()> {
    let state = setup();
    state
        .services
        .material_orders
        .submit(order_payload("PLA Filament", "Printer farm stock"), &member())
        .await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    state
        .services
        .material_orders
        .submit(order_payload("Plywood 6mm", "Laser stock"), &admin())
        .await?;

    let view = state.repository.material_orders.watch().open().await?;
    let current = view.current();
    assert_eq!(current.len(), 2);
    assert_eq!(current[0].data.material_name, "Plywood 6mm");
    assert_eq!(current[1].data.material_name, "PLA Filament");
    Ok(())
}

#[tokio::test]
async fn test_delete_order() -> Result<()> {
    let state = setup();
    let id = state
        .services
        .material_orders
        .submit(order_payload("Felt Pads", "Furniture feet"), &member())
        .await?;
    state.services.material_orders.delete(&id).await?;
    let err = state.services.material_orders.get(&id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}
