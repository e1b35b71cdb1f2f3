// src/handlers/coupons.rs

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
    middleware::rbac::{ManageCoupons, RequireRole},
    models::coupon::{CouponListQuery, CouponView, CreateCouponPayload, UpdateCouponPayload},
};

#[utoipa::path(
    get,
    path = "/api/coupons",
    tag = "Coupons",
    params(CouponListQuery),
    responses((status = 200, description = "Cupons ativos", body = [CouponView]))
)]
pub async fn list_coupons(
    State(app_state): State<AppState>,
    Query(query): Query<CouponListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let coupons = app_state.coupon_service.list(query.q.as_deref()).await?;
    Ok(ApiResponse::ok("Coupons retrieved", coupons))
}

#[utoipa::path(
    get,
    path = "/api/coupons/{id}",
    tag = "Coupons",
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom", body = CouponView),
        (status = 404, description = "Cupom não encontrado")
    )
)]
pub async fn get_coupon(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let coupon = app_state.coupon_service.get(id).await?;
    Ok(ApiResponse::ok("Coupon retrieved", coupon))
}

#[utoipa::path(
    post,
    path = "/api/manager/coupons",
    tag = "Coupons",
    request_body = CreateCouponPayload,
    responses((status = 201, description = "Cupom criado", body = CouponView)),
    security(("api_jwt" = []))
)]
pub async fn create_coupon(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageCoupons>,
    Json(payload): Json<CreateCouponPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let coupon = app_state.coupon_service.create(&payload).await?;
    Ok(ApiResponse::created("Coupon created", coupon))
}

#[utoipa::path(
    put,
    path = "/api/manager/coupons/{id}",
    tag = "Coupons",
    request_body = UpdateCouponPayload,
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom atualizado", body = CouponView),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_coupon(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageCoupons>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCouponPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let coupon = app_state.coupon_service.update(id, &payload).await?;
    Ok(ApiResponse::ok("Coupon updated", coupon))
}

#[utoipa::path(
    delete,
    path = "/api/manager/coupons/{id}",
    tag = "Coupons",
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom removido"),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_coupon(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageCoupons>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.coupon_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Coupon deleted"))
}
