// src/db/incident_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::incident::{IncidentReport, IncidentReportView},
};

const INCIDENT_COLUMNS: &str = "id, reporter_id, report_type, description, status, \
                                is_deleted, deleted_at, created_at, updated_at";

#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        reporter_id: Uuid,
        report_type: &str,
        description: &str,
    ) -> Result<IncidentReport, AppError> {
        let sql = format!(
            "INSERT INTO incident_reports (reporter_id, report_type, description) \
             VALUES ($1, $2, $3) RETURNING {INCIDENT_COLUMNS}"
        );
        let report = sqlx::query_as::<_, IncidentReport>(&sql)
            .bind(reporter_id)
            .bind(report_type)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(report)
    }

    pub async fn find_active(&self, id: Uuid) -> Result<Option<IncidentReport>, AppError> {
        let sql = format!(
            "SELECT {INCIDENT_COLUMNS} FROM incident_reports WHERE id = $1 AND is_deleted = FALSE"
        );
        let report = sqlx::query_as::<_, IncidentReport>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(report)
    }

    pub async fn update_content(
        &self,
        id: Uuid,
        report_type: Option<&str>,
        description: Option<&str>,
    ) -> Result<IncidentReport, AppError> {
        let sql = format!(
            r#"
            UPDATE incident_reports SET
                report_type = COALESCE($2, report_type),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {INCIDENT_COLUMNS}
            "#
        );
        let report = sqlx::query_as::<_, IncidentReport>(&sql)
            .bind(id)
            .bind(report_type)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(report)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<IncidentReport>, AppError> {
        let sql = format!(
            "UPDATE incident_reports SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING {INCIDENT_COLUMNS}"
        );
        let report = sqlx::query_as::<_, IncidentReport>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(report)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<IncidentReportView>, i64), AppError> {
        let reports = sqlx::query_as::<_, IncidentReportView>(
            r#"
            SELECT
                i.id,
                i.reporter_id,
                a.name AS reporter_name,
                a.role AS reporter_role,
                i.report_type,
                i.description,
                i.status,
                i.created_at,
                i.updated_at
            FROM incident_reports i
            JOIN accounts a ON a.id = i.reporter_id
            WHERE i.is_deleted = FALSE
            ORDER BY i.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM incident_reports WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok((reports, total))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE incident_reports SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
