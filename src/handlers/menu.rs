// src/handlers/menu.rs

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
    middleware::rbac::{ManageMenu, RequireRole},
    models::menu::{
        CreateDishPayload, Dish, DishListQuery, DishSearchQuery, FeaturedQuery, UpdateDishPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "Menu",
    params(DishListQuery),
    responses((status = 200, description = "Cardápio paginado"))
)]
pub async fn list_dishes(
    State(app_state): State<AppState>,
    Query(query): Query<DishListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.menu_service.list(&query).await?;
    Ok(ApiResponse::ok("Dishes retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/menu/types",
    tag = "Menu",
    responses((status = 200, description = "Tipos de prato distintos", body = [String]))
)]
pub async fn list_types(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let types = app_state.menu_service.types().await?;
    Ok(ApiResponse::ok("Dish types retrieved", types))
}

#[utoipa::path(
    get,
    path = "/api/menu/featured",
    tag = "Menu",
    params(FeaturedQuery),
    responses((status = 200, description = "Pratos em destaque", body = [Dish]))
)]
pub async fn featured(
    State(app_state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let dishes = app_state.menu_service.featured(query.limit).await?;
    Ok(ApiResponse::ok("Featured dishes retrieved", dishes))
}

#[utoipa::path(
    get,
    path = "/api/menu/search",
    tag = "Menu",
    params(DishSearchQuery),
    responses(
        (status = 200, description = "Resultado da busca", body = [Dish]),
        (status = 400, description = "Palavra-chave vazia")
    )
)]
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<DishSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let dishes = app_state.menu_service.search(&query.keyword, query.limit).await?;
    Ok(ApiResponse::ok("Search results", dishes))
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato", body = Dish),
        (status = 404, description = "Prato não encontrado")
    )
)]
pub async fn get_dish(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dish = app_state.menu_service.get(id).await?;
    Ok(ApiResponse::ok("Dish retrieved", dish))
}

#[utoipa::path(
    post,
    path = "/api/manager/dishes",
    tag = "Menu",
    request_body = CreateDishPayload,
    responses(
        (status = 201, description = "Prato criado", body = Dish),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_dish(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageMenu>,
    Json(payload): Json<CreateDishPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let dish = app_state.menu_service.create(&payload).await?;
    Ok(ApiResponse::created("Dish created", dish))
}

#[utoipa::path(
    put,
    path = "/api/manager/dishes/{id}",
    tag = "Menu",
    request_body = UpdateDishPayload,
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato atualizado", body = Dish),
        (status = 404, description = "Prato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_dish(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageMenu>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDishPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let dish = app_state.menu_service.update(id, &payload).await?;
    Ok(ApiResponse::ok("Dish updated", dish))
}

#[utoipa::path(
    delete,
    path = "/api/manager/dishes/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato removido"),
        (status = 404, description = "Prato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_dish(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageMenu>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.menu_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Dish deleted"))
}
