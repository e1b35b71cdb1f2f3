// src/handlers/chat.rs

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
    middleware::auth::AuthenticatedUser,
    models::chat::{MarkReadResult, Message, MessageLimitQuery, SendMessagePayload},
};

#[utoipa::path(
    post,
    path = "/api/chat/messages",
    tag = "Chat",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = Message),
        (status = 400, description = "Mensagem vazia"),
        (status = 404, description = "Destinatário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let message = app_state
        .chat_service
        .send(user.id, payload.receiver_id, &payload.content)
        .await?;
    Ok(ApiResponse::created("Message sent", message))
}

#[utoipa::path(
    get,
    path = "/api/chat/sent",
    tag = "Chat",
    params(MessageLimitQuery),
    responses((status = 200, description = "Mensagens enviadas", body = [Message])),
    security(("api_jwt" = []))
)]
pub async fn sent_messages(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MessageLimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state.chat_service.sent(user.id, query.limit).await?;
    Ok(ApiResponse::ok("Sent messages retrieved", messages))
}

#[utoipa::path(
    get,
    path = "/api/chat/conversations/{other_id}",
    tag = "Chat",
    params(
        ("other_id" = Uuid, Path, description = "ID da outra conta"),
        MessageLimitQuery
    ),
    responses((status = 200, description = "Conversa em ordem cronológica", body = [Message])),
    security(("api_jwt" = []))
)]
pub async fn conversation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(other_id): Path<Uuid>,
    Query(query): Query<MessageLimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state
        .chat_service
        .conversation(user.id, other_id, query.limit)
        .await?;
    Ok(ApiResponse::ok("Conversation retrieved", messages))
}

#[utoipa::path(
    put,
    path = "/api/chat/conversations/{other_id}/read",
    tag = "Chat",
    params(("other_id" = Uuid, Path, description = "ID da outra conta")),
    responses((status = 200, description = "Mensagens marcadas como lidas", body = MarkReadResult)),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(other_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.chat_service.mark_read(user.id, other_id).await?;
    Ok(ApiResponse::ok("Conversation marked as read", result))
}
