//! Data models for Leihwerk

pub mod enums;
pub mod equipment;
pub mod material_order;
pub mod printer;
pub mod problem_report;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use enums::{
    Category, EquipmentStatus, OrderAction, OrderSource, OrderStatus, Priority, PrinterStatus,
    ReportAction, ReportStatus, RequestAction, RequestStatus, RequestType, Role, Severity,
};
pub use equipment::{CreateEquipment, Equipment, UpdateEquipment};
pub use material_order::{CreateMaterialOrder, MaterialOrder};
pub use printer::{CreatePrinter, Printer, UpdatePrinter};
pub use problem_report::{FileProblemReport, ProblemReport};
pub use request::{EquipmentRequest, SubmitEquipmentRequest};
pub use user::{CreateUser, UpdateUser, User, UserContext};
