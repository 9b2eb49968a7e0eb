//! Printer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::PrinterStatus;

/// Printer document (`printers` collection)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub name: String,
    pub model: Option<String>,
    /// Build volume as displayed, e.g. "250 x 210 x 210 mm".
    pub build_volume: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    pub price_per_hour: Option<f64>,
    #[serde(default)]
    pub status: PrinterStatus,
    pub notes: Option<String>,
    pub last_status_change_by: Option<String>,
    pub last_status_change_by_kennung: Option<String>,
    pub last_status_change_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create printer payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrinter {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub model: Option<String>,
    pub build_volume: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    pub price_per_hour: Option<f64>,
    pub notes: Option<String>,
}

/// Update printer payload. Status changes go through the printer service
/// so the attribution fields stay filled in. `None` fields serialize to
/// nothing, so the resulting patch leaves them alone.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrinter {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub model: Option<String>,
    pub build_volume: Option<String>,
    pub materials: Option<Vec<String>>,
    pub price_per_hour: Option<f64>,
    pub notes: Option<String>,
}
