//! Lifecycle services
//!
//! One service per entity family. Each transition validates the requested
//! edge against the status tables in `models::enums`, issues the primary
//! write, then any compensating write to the referenced entity. The
//! compensating write is best-effort: its failure is logged and the
//! operation still reports success, the accepted inconsistency window of
//! a store without cross-collection transactions.

pub mod equipment;
pub mod material_orders;
pub mod printers;
pub mod problem_reports;
pub mod requests;
pub mod users;

use crate::{config::LendingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub requests: requests::RequestsService,
    pub material_orders: material_orders::MaterialOrdersService,
    pub problem_reports: problem_reports::ProblemReportsService,
    pub printers: printers::PrintersService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone(), lending),
            material_orders: material_orders::MaterialOrdersService::new(repository.clone()),
            problem_reports: problem_reports::ProblemReportsService::new(repository.clone()),
            printers: printers::PrintersService::new(repository.clone()),
            users: users::UsersService::new(repository),
        }
    }
}
