// src/handlers/incidents.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::{ManageIncidents, ReportIncident, RequireRole},
    models::incident::{
        CreateIncidentPayload, IncidentListQuery, IncidentReport, UpdateIncidentPayload,
        UpdateIncidentStatusPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "Incidents",
    request_body = CreateIncidentPayload,
    responses((status = 201, description = "Ocorrência registrada", body = IncidentReport)),
    security(("api_jwt" = []))
)]
pub async fn create_report(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReportIncident>,
    Json(payload): Json<CreateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state.incident_service.create(&user, &payload).await?;
    Ok(ApiResponse::created("Incident report created", report))
}

#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    request_body = UpdateIncidentPayload,
    params(("id" = Uuid, Path, description = "ID da ocorrência")),
    responses(
        (status = 200, description = "Ocorrência atualizada", body = IncidentReport),
        (status = 403, description = "Ocorrência de outro funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_report(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReportIncident>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state.incident_service.update(&user, id, &payload).await?;
    Ok(ApiResponse::ok("Incident report updated", report))
}

#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "Incidents",
    params(IncidentListQuery),
    responses((status = 200, description = "Ocorrências com nome e cargo de quem registrou")),
    security(("api_jwt" = []))
)]
pub async fn list_reports(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageIncidents>,
    Query(query): Query<IncidentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.incident_service.list(&query).await?;
    Ok(ApiResponse::ok("Incident reports retrieved", page))
}

#[utoipa::path(
    put,
    path = "/api/incidents/{id}/status",
    tag = "Incidents",
    request_body = UpdateIncidentStatusPayload,
    params(("id" = Uuid, Path, description = "ID da ocorrência")),
    responses(
        (status = 200, description = "Status atualizado", body = IncidentReport),
        (status = 404, description = "Ocorrência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageIncidents>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncidentStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let report = app_state.incident_service.update_status(id, &payload.status).await?;
    Ok(ApiResponse::ok("Incident status updated", report))
}

#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(("id" = Uuid, Path, description = "ID da ocorrência")),
    responses(
        (status = 200, description = "Ocorrência removida"),
        (status = 404, description = "Ocorrência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_report(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageIncidents>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.incident_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Incident report deleted"))
}
