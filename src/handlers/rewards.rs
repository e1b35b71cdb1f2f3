// src/handlers/rewards.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{EarnPoints, RequireRole},
    },
    models::{
        coupon::{MyCouponsQuery, UserCoupon},
        reward::{
            BalanceView, EarnPointsPayload, EarnResult, HistoryQuery, RedeemPointsPayload,
            RedeemResult,
        },
    },
};

#[utoipa::path(
    post,
    path = "/api/rewards/earn",
    tag = "Rewards",
    request_body = EarnPointsPayload,
    responses(
        (status = 200, description = "Pontos creditados", body = EarnResult),
        (status = 403, description = "Cargo sem permissão"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn earn_points(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EarnPoints>,
    Json(payload): Json<EarnPointsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let result = app_state.reward_service.earn(&user, &payload).await?;
    Ok(ApiResponse::ok("Points credited", result))
}

#[utoipa::path(
    post,
    path = "/api/rewards/redeem",
    tag = "Rewards",
    request_body = RedeemPointsPayload,
    responses(
        (status = 201, description = "Cupom pessoal emitido", body = RedeemResult),
        (status = 400, description = "Saldo insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_points(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<RedeemPointsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let result = app_state.reward_service.redeem(&user, &payload).await?;
    Ok(ApiResponse::created("Points redeemed successfully", result))
}

#[utoipa::path(
    get,
    path = "/api/rewards/history",
    tag = "Rewards",
    params(HistoryQuery),
    responses((status = 200, description = "Histórico de pontos paginado")),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.reward_service.history(&user, &query).await?;
    Ok(ApiResponse::ok("Reward history retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/rewards/balance",
    tag = "Rewards",
    responses((status = 200, description = "Saldo atual", body = BalanceView)),
    security(("api_jwt" = []))
)]
pub async fn balance(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state.reward_service.balance(&user).await?;
    Ok(ApiResponse::ok("Balance retrieved", balance))
}

#[utoipa::path(
    get,
    path = "/api/rewards/coupons",
    tag = "Rewards",
    params(MyCouponsQuery),
    responses((status = 200, description = "Cupons pessoais", body = [UserCoupon])),
    security(("api_jwt" = []))
)]
pub async fn my_coupons(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MyCouponsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let coupons = app_state.reward_service.my_coupons(&user, query.status).await?;
    Ok(ApiResponse::ok("Coupons retrieved", coupons))
}
