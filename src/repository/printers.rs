//! Printer repository

use chrono::Utc;
use serde_json::json;

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    live::LiveViewBuilder,
    models::enums::PrinterStatus,
    models::printer::{Printer, UpdatePrinter},
    models::user::UserContext,
    store::{collections, to_document, DocId, Document, Filter, SharedStore},
};

#[derive(Clone)]
pub struct PrintersRepository {
    store: SharedStore,
}

impl PrintersRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a printer document
    pub async fn create(&self, printer: &Printer) -> AppResult<DocId> {
        let mut fields = to_document(printer)?;
        stamp_create(&mut fields);
        let id = self.store.insert(collections::PRINTERS, fields).await?;
        Ok(id)
    }

    /// Get a printer by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<Printer>> {
        let doc = self
            .store
            .get(collections::PRINTERS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Printer {} not found", id)))?;
        super::decode(collections::PRINTERS, doc)
            .ok_or_else(|| AppError::Internal(format!("Printer {} is malformed", id)))
    }

    /// List all printers, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<Printer>>> {
        let snapshot = self.store.list(collections::PRINTERS, Filter::all()).await?;
        let mut docs: Vec<Doc<Printer>> = decode_snapshot(collections::PRINTERS, snapshot);
        docs.sort_by(|a, b| a.data.name.cmp(&b.data.name));
        Ok(docs)
    }

    /// Live view over all printers, sorted by name
    pub fn watch(&self) -> LiveViewBuilder<Printer> {
        LiveViewBuilder::<Printer>::new(self.store.clone(), collections::PRINTERS)
            .sorted_by(|a, b| a.data.name.cmp(&b.data.name))
    }

    /// Apply an update payload
    pub async fn update(&self, id: &DocId, data: &UpdatePrinter) -> AppResult<()> {
        let mut patch = to_document(data)?;
        stamp_update(&mut patch);
        self.store.update(collections::PRINTERS, id, patch).await?;
        Ok(())
    }

    /// Set the printer status. `by` is `None` for the lifecycle side
    /// effects, which keep whatever attribution is on the document.
    pub async fn set_status(
        &self,
        id: &DocId,
        status: PrinterStatus,
        by: Option<&UserContext>,
    ) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(status));
        patch.insert("lastStatusChangeAt".to_string(), json!(Utc::now()));
        if let Some(by) = by {
            patch.insert("lastStatusChangeBy".to_string(), json!(by.name));
            patch.insert("lastStatusChangeByKennung".to_string(), json!(by.kennung));
        }
        stamp_update(&mut patch);
        self.store.update(collections::PRINTERS, id, patch).await?;
        Ok(())
    }

    /// Delete a printer
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::PRINTERS, id).await?;
        Ok(())
    }
}
