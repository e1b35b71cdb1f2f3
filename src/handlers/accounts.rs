// src/handlers/accounts.rs

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
        auth::AuthenticatedUser,
        rbac::{DeleteAccount, ManageStaff, RequireRole},
    },
    models::account::{
        Account, AccountListQuery, AuthResponse, ChangePasswordPayload, CreateStaffPayload,
        LoginPayload, RegisterPayload, UpdateProfilePayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Email já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.account_service.register(&payload).await?;
    Ok(ApiResponse::created("Account registered successfully", response))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.account_service.login(&payload).await?;
    Ok(ApiResponse::ok("Login successful", response))
}

#[utoipa::path(
    get,
    path = "/api/accounts/me",
    tag = "Accounts",
    responses(
        (status = 200, description = "Conta do usuário logado", body = Account),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let account = app_state.account_service.me(user.id).await?;
    Ok(ApiResponse::ok("Account retrieved", account))
}

#[utoipa::path(
    put,
    path = "/api/accounts/me",
    tag = "Accounts",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Account)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let account = app_state.account_service.update_profile(user.id, &payload).await?;
    Ok(ApiResponse::ok("Profile updated", account))
}

#[utoipa::path(
    put,
    path = "/api/accounts/me/password",
    tag = "Accounts",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada"),
        (status = 400, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.account_service.change_password(user.id, &payload).await?;
    Ok(ApiResponse::<()>::message("Password changed successfully"))
}

#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "Accounts",
    request_body = CreateStaffPayload,
    responses(
        (status = 201, description = "Conta de funcionário criada", body = Account),
        (status = 403, description = "Cargo sem permissão"),
        (status = 409, description = "Email já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageStaff>,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let account = app_state.account_service.create_staff(&payload).await?;
    Ok(ApiResponse::created("Account created", account))
}

#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Accounts",
    params(AccountListQuery),
    responses(
        (status = 200, description = "Lista paginada de contas")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManageStaff>,
    Query(query): Query<AccountListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.account_service.list(&query).await?;
    Ok(ApiResponse::ok("Accounts retrieved", page))
}

#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta removida"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    _guard: RequireRole<DeleteAccount>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.account_service.delete(id).await?;
    Ok(ApiResponse::<()>::message("Account deleted"))
}
