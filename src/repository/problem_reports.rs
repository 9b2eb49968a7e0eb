//! Problem report repository

use chrono::Utc;
use serde_json::json;

use super::{decode_snapshot, stamp_create, stamp_update, Doc};
use crate::{
    error::{AppError, AppResult},
    live::LiveViewBuilder,
    models::enums::ReportStatus,
    models::problem_report::ProblemReport,
    models::user::UserContext,
    store::{collections, to_document, DocId, Document, Filter, SharedStore},
};

#[derive(Clone)]
pub struct ProblemReportsRepository {
    store: SharedStore,
}

impl ProblemReportsRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a problem report document
    pub async fn create(&self, report: &ProblemReport) -> AppResult<DocId> {
        let mut fields = to_document(report)?;
        stamp_create(&mut fields);
        let id = self
            .store
            .insert(collections::PROBLEM_REPORTS, fields)
            .await?;
        Ok(id)
    }

    /// Get a problem report by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<ProblemReport>> {
        let doc = self
            .store
            .get(collections::PROBLEM_REPORTS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Problem report {} not found", id)))?;
        super::decode(collections::PROBLEM_REPORTS, doc)
            .ok_or_else(|| AppError::Internal(format!("Problem report {} is malformed", id)))
    }

    /// List all problem reports, newest first
    pub async fn list(&self) -> AppResult<Vec<Doc<ProblemReport>>> {
        let snapshot = self
            .store
            .list(collections::PROBLEM_REPORTS, Filter::all())
            .await?;
        let mut docs: Vec<Doc<ProblemReport>> =
            decode_snapshot(collections::PROBLEM_REPORTS, snapshot);
        docs.sort_by(|a, b| b.data.reported_at.cmp(&a.data.reported_at));
        Ok(docs)
    }

    /// Live view over all problem reports, newest first
    pub fn watch(&self) -> LiveViewBuilder<ProblemReport> {
        LiveViewBuilder::<ProblemReport>::new(self.store.clone(), collections::PROBLEM_REPORTS)
            .sorted_by(|a, b| b.data.reported_at.cmp(&a.data.reported_at))
    }

    pub async fn mark_in_progress(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(ReportStatus::InProgress));
        patch.insert("startedAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store
            .update(collections::PROBLEM_REPORTS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_resolved(&self, id: &DocId, by: &UserContext) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(ReportStatus::Resolved));
        patch.insert("resolvedAt".to_string(), json!(Utc::now()));
        patch.insert("resolvedBy".to_string(), json!(by.name));
        patch.insert("resolvedByKennung".to_string(), json!(by.kennung));
        stamp_update(&mut patch);
        self.store
            .update(collections::PROBLEM_REPORTS, id, patch)
            .await?;
        Ok(())
    }

    pub async fn mark_closed(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(ReportStatus::Closed));
        patch.insert("closedAt".to_string(), json!(Utc::now()));
        stamp_update(&mut patch);
        self.store
            .update(collections::PROBLEM_REPORTS, id, patch)
            .await?;
        Ok(())
    }

    /// Reopen: back to `open`, clearing the resolution fields
    pub async fn mark_reopened(&self, id: &DocId) -> AppResult<()> {
        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(ReportStatus::Open));
        patch.insert("resolvedAt".to_string(), serde_json::Value::Null);
        patch.insert("resolvedBy".to_string(), serde_json::Value::Null);
        patch.insert("resolvedByKennung".to_string(), serde_json::Value::Null);
        stamp_update(&mut patch);
        self.store
            .update(collections::PROBLEM_REPORTS, id, patch)
            .await?;
        Ok(())
    }

    /// Delete a problem report
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.store.delete(collections::PROBLEM_REPORTS, id).await?;
        Ok(())
    }
}
