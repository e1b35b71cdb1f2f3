// src/handlers/tables.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::{ManageTables, RequireRole},
    models::table::{CreateTablePayload, DiningTable, UpdateTablePayload},
};

#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "Tables",
    responses((status = 200, description = "Mesas ativas", body = [DiningTable])),
    security(("api_jwt" = []))
)]
pub async fn list_tables(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tables = app_state.table_service.list().await?;
    Ok(ApiResponse::ok("Tables retrieved", tables))
}

#[utoipa::path(
    get,
    path = "/api/tables/{id}",
    tag = "Tables",
    params(("id" = Uuid, Path, description = "ID da mesa")),
    responses(
        (status = 200, description = "Mesa", body = DiningTable),
        (status = 404, description = "Mesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_table(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let table = app_state.table_service.get(id).await?;
    Ok(ApiResponse::ok("Table retrieved", table))
}

#[utoipa::path(
    post,
    path = "/api/tables",
    tag = "Tables",
    request_body = CreateTablePayload,
    responses((status = 201, description = "Mesa criada", body = DiningTable)),
    security(("api_jwt" = []))
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageTables>,
    Json(payload): Json<CreateTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let table = app_state.table_service.create(&payload).await?;
    Ok(ApiResponse::created("Table created", table))
}

#[utoipa::path(
    put,
    path = "/api/tables/{id}",
    tag = "Tables",
    request_body = UpdateTablePayload,
    params(("id" = Uuid, Path, description = "ID da mesa")),
    responses(
        (status = 200, description = "Mesa atualizada", body = DiningTable),
        (status = 404, description = "Mesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_table(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageTables>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let table = app_state.table_service.update(id, &payload).await?;
    Ok(ApiResponse::ok("Table updated", table))
}

#[utoipa::path(
    delete,
    path = "/api/tables/{id}",
    tag = "Tables",
    params(("id" = Uuid, Path, description = "ID da mesa")),
    responses(
        (status = 200, description = "Mesa removida"),
        (status = 404, description = "Mesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_table(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageTables>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.table_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Table deleted"))
}
