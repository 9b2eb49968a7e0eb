//! Problem report model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::{ReportStatus, Severity};

/// Problem report document (`problemReports` collection)
///
/// A report targets either a printer (`printerId` plus denormalized
/// `printerName`) or some other device named in free text. Older documents
/// stored severity under `priority`, hence the alias.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemReport {
    pub printer_id: Option<String>,
    pub printer_name: Option<String>,
    pub device: Option<String>,
    pub problem_type: Option<String>,
    #[serde(alias = "priority")]
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub status: ReportStatus,
    pub reported_by: Option<String>,
    pub reported_by_kennung: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_by_kennung: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProblemReport {
    /// Printer reference, if the report is about a printer at all.
    pub fn printer_ref(&self) -> Option<&str> {
        self.printer_id.as_deref()
    }
}

/// File problem report payload. Either a printer reference or a free-text
/// device is required; the service checks that, since it is a cross-field
/// rule.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FileProblemReport {
    pub printer_id: Option<String>,
    pub device: Option<String>,
    pub problem_type: Option<String>,
    pub severity: Severity,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}
