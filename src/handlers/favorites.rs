// src/handlers/favorites.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::favorite::{AddFavoritePayload, Favorite, FavoriteCheck, FavoriteCount, FavoriteDish},
};

#[utoipa::path(
    post,
    path = "/api/favorites",
    tag = "Favorites",
    request_body = AddFavoritePayload,
    responses(
        (status = 201, description = "Prato favoritado", body = Favorite),
        (status = 404, description = "Prato não encontrado"),
        (status = 409, description = "Já está nos favoritos")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_favorite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddFavoritePayload>,
) -> Result<impl IntoResponse, AppError> {
    let favorite = app_state.favorite_service.add(user.id, payload.dish_id).await?;
    Ok(ApiResponse::created("Dish added to favorites", favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "Favorites",
    responses((status = 200, description = "Pratos favoritos", body = [FavoriteDish])),
    security(("api_jwt" = []))
)]
pub async fn list_favorites(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let favorites = app_state.favorite_service.list(user.id).await?;
    Ok(ApiResponse::ok("Favorites retrieved", favorites))
}

#[utoipa::path(
    get,
    path = "/api/favorites/count",
    tag = "Favorites",
    responses((status = 200, description = "Quantidade de favoritos", body = FavoriteCount)),
    security(("api_jwt" = []))
)]
pub async fn count_favorites(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state.favorite_service.count(user.id).await?;
    Ok(ApiResponse::ok("Favorites counted", count))
}

#[utoipa::path(
    get,
    path = "/api/favorites/{dish_id}/check",
    tag = "Favorites",
    params(("dish_id" = Uuid, Path, description = "ID do prato")),
    responses((status = 200, description = "Se o prato é favorito", body = FavoriteCheck)),
    security(("api_jwt" = []))
)]
pub async fn check_favorite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(dish_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let check = app_state.favorite_service.check(user.id, dish_id).await?;
    Ok(ApiResponse::ok("Favorite checked", check))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{dish_id}",
    tag = "Favorites",
    params(("dish_id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Favorito removido"),
        (status = 404, description = "Favorito não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_favorite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(dish_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.favorite_service.remove(user.id, dish_id).await?;
    Ok(ApiResponse::<()>::message("Dish removed from favorites"))
}
