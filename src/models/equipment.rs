//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::{Category, EquipmentStatus};

/// Equipment document (`equipment` collection)
///
/// `rentedByKennung` is set when the item went out through the request
/// lifecycle, `borrowedBy` when an admin checked it out directly. At most
/// one of the two is present; both are absent while the item is available.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub name: String,
    pub category: Category,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: EquipmentStatus,
    #[serde(default)]
    pub requires_deposit: bool,
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub deposit_paid: bool,
    pub rented_by_kennung: Option<String>,
    pub borrowed_by: Option<String>,
    pub rented_at: Option<DateTime<Utc>>,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Equipment {
    /// Kennung of whoever currently holds the item, however it left.
    pub fn borrower(&self) -> Option<&str> {
        self.rented_by_kennung
            .as_deref()
            .or(self.borrowed_by.as_deref())
    }
}

/// Create equipment payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub category: Category,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub requires_deposit: bool,
    pub deposit_amount: Option<f64>,
}

/// Update equipment payload. Status is deliberately absent; status moves
/// through the lifecycle service so the borrower invariant holds.
///
/// Serializing one of these yields exactly the patch to send: `None`
/// fields are skipped, so untouched fields stay untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requires_deposit: Option<bool>,
    pub deposit_amount: Option<f64>,
}
