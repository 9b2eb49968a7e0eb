//! Problem report lifecycle service
//!
//! Reports and printers are coupled: filing a high or critical report
//! against a printer takes the printer out of service, resolving such a
//! report puts it back. The printer write is the secondary, best-effort
//! half of each of those operations.

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::enums::{PrinterStatus, ReportAction, ReportStatus},
    models::problem_report::{FileProblemReport, ProblemReport},
    models::user::UserContext,
    repository::{Doc, Repository},
    store::DocId,
};

fn ensure(status: ReportStatus, action: ReportAction) -> AppResult<()> {
    match status.next(action) {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_transition(action.as_str(), status.as_str())),
    }
}

#[derive(Clone)]
pub struct ProblemReportsService {
    repository: Repository,
}

impl ProblemReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// File a problem report.
    ///
    /// A report names either a printer or a free-text device. When a
    /// high/critical report names a printer, that printer is marked
    /// broken right after the report is written.
    pub async fn file(&self, data: FileProblemReport, ctx: &UserContext) -> AppResult<DocId> {
        data.validate()?;
        let has_device = data.device.as_deref().is_some_and(|d| !d.trim().is_empty());
        if data.printer_id.is_none() && !has_device {
            return Err(AppError::Validation(
                "A printer or a device is required".to_string(),
            ));
        }

        // Verify the printer exists and pick up its name for display
        let mut printer_name = None;
        if let Some(printer_id) = data.printer_id.as_deref() {
            let printer = self.repository.printers.get(&DocId::from(printer_id)).await?;
            printer_name = Some(printer.data.name);
        }

        let report = ProblemReport {
            printer_id: data.printer_id,
            printer_name,
            device: data.device,
            problem_type: data.problem_type,
            severity: data.severity,
            description: data.description,
            status: ReportStatus::Open,
            reported_by: Some(ctx.name.clone()),
            reported_by_kennung: Some(ctx.kennung.clone()),
            reported_at: Some(Utc::now()),
            ..Default::default()
        };
        let id = self.repository.problem_reports.create(&report).await?;
        info!(report = %id, severity = %report.severity, "problem report filed");

        if report.severity.impacts_printer() {
            if let Some(printer_id) = report.printer_id.as_deref() {
                let printer_id = DocId::from(printer_id);
                if let Err(err) = self
                    .repository
                    .printers
                    .set_status(&printer_id, PrinterStatus::Broken, None)
                    .await
                {
                    warn!(report = %id, printer = %printer_id, %err,
                        "printer not marked broken after report was filed");
                }
            }
        }
        Ok(id)
    }

    /// Get a report by id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<ProblemReport>> {
        self.repository.problem_reports.get(id).await
    }

    /// List all reports, newest first
    pub async fn list(&self) -> AppResult<Vec<Doc<ProblemReport>>> {
        self.repository.problem_reports.list().await
    }

    /// Start working on an open report
    pub async fn start(&self, id: &DocId) -> AppResult<()> {
        let report = self.repository.problem_reports.get(id).await?;
        ensure(report.data.status, ReportAction::Start)?;
        self.repository.problem_reports.mark_in_progress(id).await
    }

    /// Resolve a report in progress. For a high/critical printer report
    /// this puts the printer back in service.
    pub async fn resolve(&self, id: &DocId, ctx: &UserContext) -> AppResult<()> {
        let report = self.repository.problem_reports.get(id).await?;
        ensure(report.data.status, ReportAction::Resolve)?;
        self.repository.problem_reports.mark_resolved(id, ctx).await?;

        if report.data.severity.impacts_printer() {
            if let Some(printer_id) = report.data.printer_ref() {
                let printer_id = DocId::from(printer_id);
                if let Err(err) = self
                    .repository
                    .printers
                    .set_status(&printer_id, PrinterStatus::Available, None)
                    .await
                {
                    warn!(report = %id, printer = %printer_id, %err,
                        "printer not reset after report was resolved");
                }
            }
        }
        Ok(())
    }

    /// Close a report in progress without resolving it. The printer is
    /// left as it is; closing is for reports that turned out moot.
    pub async fn close(&self, id: &DocId) -> AppResult<()> {
        let report = self.repository.problem_reports.get(id).await?;
        ensure(report.data.status, ReportAction::Close)?;
        self.repository.problem_reports.mark_closed(id).await
    }

    /// Reopen a report that came back
    pub async fn reopen(&self, id: &DocId) -> AppResult<()> {
        let report = self.repository.problem_reports.get(id).await?;
        ensure(report.data.status, ReportAction::Reopen)?;
        self.repository.problem_reports.mark_reopened(id).await
    }

    /// Delete a report. Deleting an unresolved high/critical printer
    /// report hands the printer back, same as resolving it would.
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        let report = self.repository.problem_reports.get(id).await?;
        self.repository.problem_reports.delete(id).await?;

        if report.data.status.needs_attention() && report.data.severity.impacts_printer() {
            if let Some(printer_id) = report.data.printer_ref() {
                let printer_id = DocId::from(printer_id);
                if let Err(err) = self
                    .repository
                    .printers
                    .set_status(&printer_id, PrinterStatus::Available, None)
                    .await
                {
                    warn!(report = %id, printer = %printer_id, %err,
                        "printer not reset after report was deleted");
                }
            }
        }
        Ok(())
    }
}
