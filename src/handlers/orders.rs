// src/handlers/orders.rs

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
    middleware::{
        auth::{AuthenticatedUser, OptionalUser},
        rbac::{RequireRole, UpdateOrderStatus, ViewNewOrders},
    },
    models::order::{
        AddOrderItemPayload, CreateOrderFromCartPayload, CreateOrderPayload, NewOrdersQuery, Order,
        OrderHistoryQuery, OrderMenu, OrderWithItems, UpdateOrderItemPayload,
        UpdateOrderStatusPayload,
    },
};

// ---
// Rotas abertas a convidados (token opcional)
// ---

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = OrderWithItems),
        (status = 400, description = "Prato ou mesa indisponível"),
        (status = 404, description = "Prato ou mesa não encontrado")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.create_order(user.as_ref(), &payload).await?;
    Ok(ApiResponse::created("Order created", order))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/menu",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Itens do pedido", body = OrderMenu),
        (status = 403, description = "Pedido de outra conta"),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn order_menu(
    State(app_state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let menu = app_state.order_service.order_menu(user.as_ref(), id).await?;
    Ok(ApiResponse::ok("Order menu retrieved", menu))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    tag = "Orders",
    request_body = AddOrderItemPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Item adicionado", body = OrderWithItems),
        (status = 400, description = "Pedido não está Pending")
    )
)]
pub async fn add_item(
    State(app_state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddOrderItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.add_item(user.as_ref(), id, &payload).await?;
    Ok(ApiResponse::ok("Item added to order", order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/items/{item_id}",
    tag = "Orders",
    request_body = UpdateOrderItemPayload,
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Quantidade atualizada", body = OrderWithItems),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateOrderItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .order_service
        .update_item(user.as_ref(), id, item_id, payload.quantity)
        .await?;
    Ok(ApiResponse::ok("Order item updated", order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/items/{item_id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 200, description = "Item removido", body = OrderWithItems),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn remove_item(
    State(app_state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .remove_item(user.as_ref(), id, item_id)
        .await?;
    Ok(ApiResponse::ok("Order item removed", order))
}

// ---
// Rotas autenticadas
// ---

#[utoipa::path(
    post,
    path = "/api/orders/from-cart",
    tag = "Orders",
    request_body = CreateOrderFromCartPayload,
    responses(
        (status = 201, description = "Pedido criado a partir do carrinho", body = OrderWithItems),
        (status = 400, description = "Carrinho vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_from_cart(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderFromCartPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.create_from_cart(&user, &payload).await?;
    Ok(ApiResponse::created("Order created from cart", order))
}

#[utoipa::path(
    get,
    path = "/api/orders/history",
    tag = "Orders",
    params(OrderHistoryQuery),
    responses((status = 200, description = "Histórico paginado com itens")),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<OrderHistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.order_service.history(&user, &query).await?;
    Ok(ApiResponse::ok("Order history retrieved", page))
}

#[utoipa::path(
    delete,
    path = "/api/orders/history/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido removido do histórico"),
        (status = 400, description = "Pedido ainda em andamento"),
        (status = 403, description = "Pedido de outra conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.order_service.delete_history(&user, id).await?;
    Ok(ApiResponse::<()>::message("Order deleted from history"))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/reorder",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido de origem")),
    responses(
        (status = 201, description = "Novo pedido com preços atuais", body = OrderWithItems),
        (status = 400, description = "Algum prato está indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn reorder(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.reorder(&user, id).await?;
    Ok(ApiResponse::created("Order placed again", order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status alterado", body = Order),
        (status = 400, description = "Transição inválida"),
        (status = 403, description = "Cargo sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<UpdateOrderStatus>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .update_status(&user, id, payload.status)
        .await?;
    Ok(ApiResponse::ok("Order status updated", order))
}

#[utoipa::path(
    get,
    path = "/api/orders/new",
    tag = "Orders",
    params(NewOrdersQuery),
    responses((status = 200, description = "Pedidos Pending mais recentes")),
    security(("api_jwt" = []))
)]
pub async fn new_orders(
    State(app_state): State<AppState>,
    _guard: RequireRole<ViewNewOrders>,
    Query(query): Query<NewOrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.order_service.new_orders(&query).await?;
    Ok(ApiResponse::ok("New orders retrieved", page))
}
