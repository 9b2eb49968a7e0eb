//! Equipment service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::enums::EquipmentStatus,
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    repository::{Doc, Repository},
    store::DocId,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create equipment, starting out available
    pub async fn create(&self, data: CreateEquipment) -> AppResult<DocId> {
        data.validate()?;
        let equipment = Equipment {
            name: data.name,
            category: data.category,
            location: data.location,
            description: data.description,
            status: EquipmentStatus::Available,
            requires_deposit: data.requires_deposit,
            deposit_amount: data.deposit_amount,
            ..Default::default()
        };
        self.repository.equipment.create(&equipment).await
    }

    /// Get equipment by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<Equipment>> {
        self.repository.equipment.get(id).await
    }

    /// List all equipment, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<Equipment>>> {
        self.repository.equipment.list().await
    }

    /// Update descriptive fields
    pub async fn update(&self, id: &DocId, data: UpdateEquipment) -> AppResult<()> {
        data.validate()?;
        self.repository.equipment.update(id, &data).await
    }

    /// Set a maintenance status by hand.
    ///
    /// `borrowed`/`rented` are only reachable through checkout and the
    /// request lifecycle; setting them here would leave the borrower
    /// reference dangling. Setting `available` clears any borrower.
    pub async fn set_status(&self, id: &DocId, status: EquipmentStatus) -> AppResult<()> {
        let equipment = self.repository.equipment.get(id).await?;
        if status.is_lent() {
            return Err(AppError::invalid_transition(
                format!("set status '{}'", status),
                equipment.data.status.as_str(),
            ));
        }
        if status == EquipmentStatus::Available {
            return self.repository.equipment.mark_available(id).await;
        }
        self.repository.equipment.set_status(id, status).await
    }

    /// Direct checkout without a request, admin desk style
    pub async fn check_out(&self, id: &DocId, kennung: &str) -> AppResult<()> {
        if kennung.trim().is_empty() {
            return Err(AppError::Validation("Borrower Kennung is required".to_string()));
        }
        let equipment = self.repository.equipment.get(id).await?;
        if equipment.data.status != EquipmentStatus::Available {
            return Err(AppError::invalid_transition(
                "check out",
                equipment.data.status.as_str(),
            ));
        }
        self.repository.equipment.mark_borrowed(id, kennung).await
    }

    /// Take an item back. Taking back an item that is already in is a
    /// no-op, matching the compensating write it shares code with.
    pub async fn check_in(&self, id: &DocId) -> AppResult<()> {
        // Existence check so a typo surfaces as NotFound, not silence
        self.repository.equipment.get(id).await?;
        self.repository.equipment.mark_available(id).await
    }

    /// Delete equipment
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.repository.equipment.delete(id).await
    }
}
