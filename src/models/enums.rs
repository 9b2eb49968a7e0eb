//! Shared domain enums (matching the stored wire vocabulary)
//!
//! Every status lives here exactly once. The lifecycle services consult the
//! `next()` tables below instead of re-deriving allowed edges, so the value
//! sets cannot drift between entities the way per-screen copies would.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Equipment categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Keys,
    #[default]
    Hardware,
    Books,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Keys => "keys",
            Category::Hardware => "hardware",
            Category::Books => "books",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment status codes
///
/// `borrowed` is a direct admin checkout, `rented` a checkout that went
/// through the request lifecycle. Both carry a borrower reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Available,
    Borrowed,
    Rented,
    Maintenance,
    Broken,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "available",
            EquipmentStatus::Borrowed => "borrowed",
            EquipmentStatus::Rented => "rented",
            EquipmentStatus::Maintenance => "maintenance",
            EquipmentStatus::Broken => "broken",
        }
    }

    /// True when the status implies a borrower reference on the document.
    pub fn is_lent(self) -> bool {
        matches!(self, EquipmentStatus::Borrowed | EquipmentStatus::Rented)
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

/// Discriminator of the shared `requests` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Equipment,
    /// Request kinds this build does not handle yet; kept so foreign
    /// documents in the shared collection decode instead of erroring.
    #[serde(other)]
    Unknown,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Equipment => "equipment",
            RequestType::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Equipment request status codes
///
/// `active` appears only in documents written by earlier builds and behaves
/// like `given`; new writes never produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Given,
    Active,
    ReturnRequested,
    Returned,
    Rejected,
}

/// Lifecycle actions on an equipment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
    Give,
    RequestReturn,
    ConfirmReturn,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::Give => "give",
            RequestAction::RequestReturn => "request return",
            RequestAction::ConfirmReturn => "confirm return",
        }
    }
}

impl std::fmt::Display for RequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Given => "given",
            RequestStatus::Active => "active",
            RequestStatus::ReturnRequested => "return_requested",
            RequestStatus::Returned => "returned",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Target state for `action`, or `None` when the edge does not exist.
    pub fn next(self, action: RequestAction) -> Option<RequestStatus> {
        match (self, action) {
            (RequestStatus::Pending, RequestAction::Approve) => Some(RequestStatus::Approved),
            (RequestStatus::Pending, RequestAction::Reject) => Some(RequestStatus::Rejected),
            (RequestStatus::Approved, RequestAction::Give) => Some(RequestStatus::Given),
            (RequestStatus::Given | RequestStatus::Active, RequestAction::RequestReturn) => {
                Some(RequestStatus::ReturnRequested)
            }
            (RequestStatus::ReturnRequested, RequestAction::ConfirmReturn) => {
                Some(RequestStatus::Returned)
            }
            _ => None,
        }
    }

    /// Non-terminal states still counting against an equipment item.
    pub fn is_open(self) -> bool {
        !matches!(self, RequestStatus::Returned | RequestStatus::Rejected)
    }

    /// States in which deleting the request must hand the equipment back.
    pub fn holds_equipment(self) -> bool {
        matches!(
            self,
            RequestStatus::Approved
                | RequestStatus::Given
                | RequestStatus::Active
                | RequestStatus::ReturnRequested
        )
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Material order status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Purchased,
    Delivered,
    Cancelled,
}

/// Lifecycle actions on a material order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Approve,
    Reject,
    MarkPurchased,
    MarkDelivered,
    Cancel,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Approve => "approve",
            OrderAction::Reject => "reject",
            OrderAction::MarkPurchased => "mark purchased",
            OrderAction::MarkDelivered => "mark delivered",
            OrderAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Purchased => "purchased",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Target state for `action`, or `None` when the edge does not exist.
    pub fn next(self, action: OrderAction) -> Option<OrderStatus> {
        match (self, action) {
            (OrderStatus::Pending, OrderAction::Approve) => Some(OrderStatus::Approved),
            (OrderStatus::Pending, OrderAction::Reject) => Some(OrderStatus::Rejected),
            (OrderStatus::Approved, OrderAction::MarkPurchased) => Some(OrderStatus::Purchased),
            (OrderStatus::Approved | OrderStatus::Purchased, OrderAction::MarkDelivered) => {
                Some(OrderStatus::Delivered)
            }
            (OrderStatus::Approved, OrderAction::Cancel) => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OrderSource
// ---------------------------------------------------------------------------

/// Who placed a material order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    #[default]
    User,
    Admin,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::User => "user",
            OrderSource::Admin => "admin",
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Material order priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReportStatus
// ---------------------------------------------------------------------------

/// Problem report status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// Lifecycle actions on a problem report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Start,
    Resolve,
    Close,
    Reopen,
}

impl ReportAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportAction::Start => "start",
            ReportAction::Resolve => "resolve",
            ReportAction::Close => "close",
            ReportAction::Reopen => "reopen",
        }
    }
}

impl std::fmt::Display for ReportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }

    /// Target state for `action`, or `None` when the edge does not exist.
    /// `closed` is the only state without outgoing edges.
    pub fn next(self, action: ReportAction) -> Option<ReportStatus> {
        match (self, action) {
            (ReportStatus::Open, ReportAction::Start) => Some(ReportStatus::InProgress),
            (ReportStatus::InProgress, ReportAction::Resolve) => Some(ReportStatus::Resolved),
            (ReportStatus::InProgress, ReportAction::Close) => Some(ReportStatus::Closed),
            (ReportStatus::InProgress | ReportStatus::Resolved, ReportAction::Reopen) => {
                Some(ReportStatus::Open)
            }
            _ => None,
        }
    }

    /// Reports still demanding attention (feeds the badge filters).
    pub fn needs_attention(self) -> bool {
        matches!(self, ReportStatus::Open | ReportStatus::InProgress)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Problem report severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Severities that take the referenced printer out of service.
    pub fn impacts_printer(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PrinterStatus
// ---------------------------------------------------------------------------

/// Printer status codes. Set directly by admins plus the problem report
/// side effects; there is no transition table to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterStatus {
    #[default]
    Available,
    Printing,
    Maintenance,
    Broken,
}

impl PrinterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterStatus::Available => "available",
            PrinterStatus::Printing => "printing",
            PrinterStatus::Maintenance => "maintenance",
            PrinterStatus::Broken => "broken",
        }
    }
}

impl std::fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_strings_match_serde() {
        fn check<T: Serialize + Copy>(variants: &[T], as_str: fn(&T) -> &'static str) {
            for v in variants {
                assert_eq!(json!(v), json!(as_str(v)));
            }
        }

        check(
            &[
                EquipmentStatus::Available,
                EquipmentStatus::Borrowed,
                EquipmentStatus::Rented,
                EquipmentStatus::Maintenance,
                EquipmentStatus::Broken,
            ],
            EquipmentStatus::as_str,
        );
        check(
            &[
                RequestStatus::Pending,
                RequestStatus::Approved,
                RequestStatus::Given,
                RequestStatus::Active,
                RequestStatus::ReturnRequested,
                RequestStatus::Returned,
                RequestStatus::Rejected,
            ],
            RequestStatus::as_str,
        );
        check(
            &[
                OrderStatus::Pending,
                OrderStatus::Approved,
                OrderStatus::Rejected,
                OrderStatus::Purchased,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ],
            OrderStatus::as_str,
        );
        check(
            &[
                ReportStatus::Open,
                ReportStatus::InProgress,
                ReportStatus::Resolved,
                ReportStatus::Closed,
            ],
            ReportStatus::as_str,
        );
        check(
            &[
                PrinterStatus::Available,
                PrinterStatus::Printing,
                PrinterStatus::Maintenance,
                PrinterStatus::Broken,
            ],
            PrinterStatus::as_str,
        );
        check(&[Category::Keys, Category::Hardware, Category::Books], Category::as_str);
        check(
            &[Severity::Low, Severity::Medium, Severity::High, Severity::Critical],
            Severity::as_str,
        );
        check(&[Priority::Low, Priority::Medium, Priority::High], Priority::as_str);
        check(&[Role::User, Role::Admin], Role::as_str);
    }

    #[test]
    fn test_request_type_tolerates_unknown_discriminators() {
        let t: RequestType = serde_json::from_value(json!("printer_time")).unwrap();
        assert_eq!(t, RequestType::Unknown);
        let t: RequestType = serde_json::from_value(json!("equipment")).unwrap();
        assert_eq!(t, RequestType::Equipment);
    }

    #[test]
    fn test_request_machine_edges() {
        assert_eq!(
            RequestStatus::Pending.next(RequestAction::Approve),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            RequestStatus::Pending.next(RequestAction::Reject),
            Some(RequestStatus::Rejected)
        );
        assert_eq!(
            RequestStatus::Approved.next(RequestAction::Give),
            Some(RequestStatus::Given)
        );
        assert_eq!(
            RequestStatus::Given.next(RequestAction::RequestReturn),
            Some(RequestStatus::ReturnRequested)
        );
        assert_eq!(
            RequestStatus::Active.next(RequestAction::RequestReturn),
            Some(RequestStatus::ReturnRequested)
        );
        assert_eq!(
            RequestStatus::ReturnRequested.next(RequestAction::ConfirmReturn),
            Some(RequestStatus::Returned)
        );
        // No shortcut from pending straight to given.
        assert_eq!(RequestStatus::Pending.next(RequestAction::Give), None);
        assert_eq!(RequestStatus::Returned.next(RequestAction::Approve), None);
        assert_eq!(RequestStatus::Rejected.next(RequestAction::Give), None);
    }

    #[test]
    fn test_order_machine_edges() {
        assert_eq!(
            OrderStatus::Pending.next(OrderAction::Approve),
            Some(OrderStatus::Approved)
        );
        assert_eq!(
            OrderStatus::Approved.next(OrderAction::MarkPurchased),
            Some(OrderStatus::Purchased)
        );
        assert_eq!(
            OrderStatus::Purchased.next(OrderAction::MarkDelivered),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::Approved.next(OrderAction::Cancel),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(OrderStatus::Pending.next(OrderAction::Cancel), None);
        assert_eq!(OrderStatus::Purchased.next(OrderAction::Cancel), None);
        assert_eq!(OrderStatus::Delivered.next(OrderAction::Approve), None);
    }

    #[test]
    fn test_report_machine_edges() {
        assert_eq!(
            ReportStatus::Open.next(ReportAction::Start),
            Some(ReportStatus::InProgress)
        );
        assert_eq!(
            ReportStatus::InProgress.next(ReportAction::Resolve),
            Some(ReportStatus::Resolved)
        );
        assert_eq!(
            ReportStatus::Resolved.next(ReportAction::Reopen),
            Some(ReportStatus::Open)
        );
        assert_eq!(
            ReportStatus::InProgress.next(ReportAction::Reopen),
            Some(ReportStatus::Open)
        );
        assert_eq!(ReportStatus::Open.next(ReportAction::Resolve), None);
        assert_eq!(ReportStatus::Closed.next(ReportAction::Reopen), None);
    }

    #[test]
    fn test_request_status_classifiers() {
        assert!(RequestStatus::Pending.is_open());
        assert!(RequestStatus::ReturnRequested.is_open());
        assert!(!RequestStatus::Returned.is_open());
        assert!(!RequestStatus::Rejected.is_open());

        assert!(!RequestStatus::Pending.holds_equipment());
        assert!(RequestStatus::Approved.holds_equipment());
        assert!(RequestStatus::Given.holds_equipment());
        assert!(RequestStatus::Active.holds_equipment());
        assert!(RequestStatus::ReturnRequested.holds_equipment());
        assert!(!RequestStatus::Returned.holds_equipment());
    }
}
