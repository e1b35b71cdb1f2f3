// src/models/incident.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::Role;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    pub id: Uuid,
    pub reporter_id: Uuid,
    #[schema(example = "Equipment")]
    pub report_type: String,
    pub description: String,
    #[schema(example = "Pending")]
    pub status: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Visão do gerente: relatório + quem reportou
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReportView {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reporter_name: String,
    pub reporter_role: Role,
    pub report_type: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentPayload {
    #[validate(length(min = 1, max = 100, message = "Report type is required"))]
    pub report_type: String,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentPayload {
    #[validate(length(min = 1, max = 100))]
    pub report_type: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentStatusPayload {
    #[validate(length(min = 1, max = 50, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncidentListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
