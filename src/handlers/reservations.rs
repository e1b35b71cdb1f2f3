// src/handlers/reservations.rs

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
    middleware::rbac::{ManageReservations, RequireRole, ReservationAccess},
    models::reservation::{
        CreateReservationPayload, Reservation, ReservationListQuery, UpdateReservationStatusPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva criada", body = Reservation),
        (status = 400, description = "Horário no passado"),
        (status = 404, description = "Mesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReservationAccess>,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reservation = app_state.reservation_service.create(&user, &payload).await?;
    Ok(ApiResponse::created("Reservation created", reservation))
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    params(ReservationListQuery),
    responses((status = 200, description = "Reservas paginadas")),
    security(("api_jwt" = []))
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReservationAccess>,
    Query(query): Query<ReservationListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.reservation_service.list(&user, &query).await?;
    Ok(ApiResponse::ok("Reservations retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva", body = Reservation),
        (status = 403, description = "Reserva de outra conta"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReservationAccess>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state.reservation_service.get(&user, id).await?;
    Ok(ApiResponse::ok("Reservation retrieved", reservation))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}/status",
    tag = "Reservations",
    request_body = UpdateReservationStatusPayload,
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Status alterado", body = Reservation),
        (status = 400, description = "Transição inválida ou prazo de cancelamento expirado"),
        (status = 403, description = "Cliente só pode cancelar as próprias reservas")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ReservationAccess>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .update_status(&user, id, payload.status)
        .await?;
    Ok(ApiResponse::ok("Reservation status updated", reservation))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva removida"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reservation_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Reservation deleted"))
}
