//! Printer service

use validator::Validate;

use crate::{
    error::AppResult,
    models::enums::PrinterStatus,
    models::printer::{CreatePrinter, Printer, UpdatePrinter},
    models::user::UserContext,
    repository::{Doc, Repository},
    store::DocId,
};

#[derive(Clone)]
pub struct PrintersService {
    repository: Repository,
}

impl PrintersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a printer, starting out available
    pub async fn create(&self, data: CreatePrinter) -> AppResult<DocId> {
        data.validate()?;
        let printer = Printer {
            name: data.name,
            model: data.model,
            build_volume: data.build_volume,
            materials: data.materials,
            price_per_hour: data.price_per_hour,
            status: PrinterStatus::Available,
            notes: data.notes,
            ..Default::default()
        };
        self.repository.printers.create(&printer).await
    }

    /// Get a printer by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<Printer>> {
        self.repository.printers.get(id).await
    }

    /// List all printers, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<Printer>>> {
        self.repository.printers.list().await
    }

    /// Update descriptive fields
    pub async fn update(&self, id: &DocId, data: UpdatePrinter) -> AppResult<()> {
        data.validate()?;
        self.repository.printers.update(id, &data).await
    }

    /// Set the printer status, recording who changed it
    pub async fn set_status(
        &self,
        id: &DocId,
        status: PrinterStatus,
        ctx: &UserContext,
    ) -> AppResult<()> {
        // Existence check so a typo surfaces as NotFound
        self.repository.printers.get(id).await?;
        self.repository.printers.set_status(id, status, Some(ctx)).await
    }

    /// Delete a printer
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.repository.printers.delete(id).await
    }
}
