//! Material order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::{OrderSource, OrderStatus, Priority};

/// Material order document (`materialOrders` collection)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOrder {
    pub material_name: String,
    pub manufacturer: Option<String>,
    pub reason: Option<String>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub source: OrderSource,
    pub requested_by: Option<String>,
    pub requested_by_kennung: Option<String>,
    pub approved_by: Option<String>,
    pub approved_by_kennung: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_by_kennung: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create material order payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialOrder {
    #[validate(length(min = 1, message = "Material name is required"))]
    pub material_name: String,
    pub manufacturer: Option<String>,
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub priority: Option<Priority>,
}
