// src/handlers/cart.rs

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
    middleware::auth::AuthenticatedUser,
    models::cart::{AddCartItemPayload, CartView, UpdateCartItemPayload},
};

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    responses((status = 200, description = "Carrinho atual com totais", body = CartView)),
    security(("api_jwt" = []))
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let cart = app_state.cart_service.get_cart(user.id).await?;
    Ok(ApiResponse::ok("Cart retrieved", cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    tag = "Cart",
    request_body = AddCartItemPayload,
    responses(
        (status = 200, description = "Item adicionado", body = CartView),
        (status = 400, description = "Prato indisponível ou quantidade inválida"),
        (status = 404, description = "Prato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddCartItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cart = app_state
        .cart_service
        .add_item(user.id, payload.dish_id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok("Item added to cart", cart))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{item_id}",
    tag = "Cart",
    request_body = UpdateCartItemPayload,
    params(("item_id" = Uuid, Path, description = "ID do item do carrinho")),
    responses(
        (status = 200, description = "Quantidade atualizada", body = CartView),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cart = app_state
        .cart_service
        .update_item(user.id, item_id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok("Cart item updated", cart))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{item_id}",
    tag = "Cart",
    params(("item_id" = Uuid, Path, description = "ID do item do carrinho")),
    responses(
        (status = 200, description = "Item removido", body = CartView),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cart = app_state.cart_service.remove_item(user.id, item_id).await?;
    Ok(ApiResponse::ok("Cart item removed", cart))
}
