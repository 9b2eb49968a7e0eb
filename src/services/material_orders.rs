//! Material order lifecycle service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::enums::{OrderAction, OrderSource, OrderStatus},
    models::material_order::{CreateMaterialOrder, MaterialOrder},
    models::user::UserContext,
    repository::{Doc, Repository},
    store::DocId,
};

fn ensure(status: OrderStatus, action: OrderAction) -> AppResult<()> {
    match status.next(action) {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_transition(action.as_str(), status.as_str())),
    }
}

#[derive(Clone)]
pub struct MaterialOrdersService {
    repository: Repository,
}

impl MaterialOrdersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Submit a material order. Validation runs before any write, so a
    /// rejected submission leaves no document behind.
    pub async fn submit(&self, data: CreateMaterialOrder, ctx: &UserContext) -> AppResult<DocId> {
        data.validate()?;
        let order = MaterialOrder {
            material_name: data.material_name,
            manufacturer: data.manufacturer,
            reason: Some(data.reason),
            quantity: Some(data.quantity),
            priority: data.priority.unwrap_or_default(),
            status: OrderStatus::Pending,
            source: if ctx.is_admin {
                OrderSource::Admin
            } else {
                OrderSource::User
            },
            requested_by: Some(ctx.name.clone()),
            requested_by_kennung: Some(ctx.kennung.clone()),
            requested_at: Some(Utc::now()),
            ..Default::default()
        };
        self.repository.material_orders.create(&order).await
    }

    /// Get an order by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<MaterialOrder>> {
        self.repository.material_orders.get(id).await
    }

    /// List all orders, newest first
    pub async fn list(&self) -> AppResult<Vec<Doc<MaterialOrder>>> {
        self.repository.material_orders.list().await
    }

    /// Approve a pending order
    pub async fn approve(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let order = self.repository.material_orders.get(id).await?;
        ensure(order.data.status, OrderAction::Approve)?;
        self.repository.material_orders.mark_approved(id, ctx).await
    }

    /// Reject a pending order
    pub async fn reject(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let order = self.repository.material_orders.get(id).await?;
        ensure(order.data.status, OrderAction::Reject)?;
        self.repository.material_orders.mark_rejected(id, ctx).await
    }

    /// Record that the material was bought
    pub async fn mark_purchased(&self, id: &DocId) -> AppResult<()> {
        let order = self.repository.material_orders.get(id).await?;
        ensure(order.data.status, OrderAction::MarkPurchased)?;
        self.repository.material_orders.mark_purchased(id).await
    }

    /// Record that the material arrived
    pub async fn mark_delivered(&self, id: &DocId) -> AppResult<()> {
        let order = self.repository.material_orders.get(id).await?;
        ensure(order.data.status, OrderAction::MarkDelivered)?;
        self.repository.material_orders.mark_delivered(id).await
    }

    /// Cancel an approved order that will not be bought after all
    pub async fn cancel(&self, id: &DocId) -> AppResult<()> {
        let order = self.repository.material_orders.get(id).await?;
        ensure(order.data.status, OrderAction::Cancel)?;
        self.repository.material_orders.mark_cancelled(id).await
    }

    /// Delete an order
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        // Existence check keeps delete of a typo id a NotFound
        self.repository.material_orders.get(id).await?;
        self.repository.material_orders.delete(id).await
    }
}
