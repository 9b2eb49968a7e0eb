//! Equipment request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::{RequestStatus, RequestType};

/// Request document (`requests` collection, discriminated by `type`)
///
/// Equipment and user are weak references: `equipmentId` points at an
/// equipment document, the user side is the human-readable Kennung rather
/// than a surrogate id. `equipmentName`/`userName` are denormalized copies
/// taken at submit time so lists render without extra lookups.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequest {
    #[serde(rename = "type", default)]
    pub request_type: RequestType,
    pub equipment_id: String,
    pub equipment_name: Option<String>,
    pub user_kennung: String,
    pub user_name: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    pub duration: Option<String>,
    pub purpose: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub given_at: Option<DateTime<Utc>>,
    pub return_requested_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_by_kennung: Option<String>,
    pub given_by: Option<String>,
    pub given_by_kennung: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_by_kennung: Option<String>,
    pub returned_by: Option<String>,
    pub returned_by_kennung: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Submit equipment request payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEquipmentRequest {
    #[validate(length(min = 1, message = "Equipment is required"))]
    pub equipment_id: String,
    pub duration: Option<String>,
    pub purpose: Option<String>,
}
