// src/services/incident_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::IncidentRepository,
    middleware::auth::AuthenticatedUser,
    models::incident::{
        CreateIncidentPayload, IncidentListQuery, IncidentReport, IncidentReportView,
        UpdateIncidentPayload,
    },
};

#[derive(Clone)]
pub struct IncidentService {
    repo: IncidentRepository,
}

impl IncidentService {
    pub fn new(repo: IncidentRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        reporter: &AuthenticatedUser,
        payload: &CreateIncidentPayload,
    ) -> Result<IncidentReport, AppError> {
        let report = self
            .repo
            .create(reporter.id, payload.report_type.trim(), payload.description.trim())
            .await?;
        tracing::info!(report_id = %report.id, reporter_id = %reporter.id, "Ocorrência registrada");
        Ok(report)
    }

    /// Só quem registrou pode editar o conteúdo.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        payload: &UpdateIncidentPayload,
    ) -> Result<IncidentReport, AppError> {
        let report = self
            .repo
            .find_active(id)
            .await?
            .ok_or(AppError::IncidentReportNotFound)?;

        if report.reporter_id != user.id {
            return Err(AppError::Forbidden("You can only edit your own reports".to_string()));
        }

        self.repo
            .update_content(
                id,
                payload.report_type.as_deref().map(str::trim),
                payload.description.as_deref().map(str::trim),
            )
            .await
    }

    pub async fn list(&self, query: &IncidentListQuery) -> Result<Paginated<IncidentReportView>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let (reports, total) = self.repo.list(page.limit, page.offset()).await?;
        Ok(Paginated::new(reports, page, total))
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<IncidentReport, AppError> {
        self.repo
            .update_status(id, status.trim())
            .await?
            .ok_or(AppError::IncidentReportNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::IncidentReportNotFound);
        }
        Ok(())
    }
}
