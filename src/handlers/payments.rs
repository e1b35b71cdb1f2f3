// src/handlers/payments.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::{ProcessPayment, RequireRole, ViewPayments},
    models::payment::{PaymentDetail, PaymentListQuery, PaymentOutcome, ProcessPaymentPayload},
};

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = ProcessPaymentPayload,
    responses(
        (status = 201, description = "Pagamento concluído", body = PaymentOutcome),
        (status = 200, description = "Pedido já estava pago", body = PaymentOutcome),
        (status = 400, description = "Cupom inválido ou pedido encerrado"),
        (status = 403, description = "Cargo ou conta sem permissão"),
        (status = 404, description = "Pedido ou cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn process_payment(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ProcessPayment>,
    Json(payload): Json<ProcessPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let outcome = app_state.payment_service.process_payment(&user, &payload).await?;
    let response = if outcome.already_paid {
        ApiResponse::ok("Order already paid", outcome)
    } else {
        ApiResponse::created("Payment processed successfully", outcome)
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(PaymentListQuery),
    responses((status = 200, description = "Pagamentos concluídos, mais recentes primeiro")),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ViewPayments>,
    Query(query): Query<PaymentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.payment_service.list(&user, &query).await?;
    Ok(ApiResponse::ok("Payments retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento com itens do pedido", body = PaymentDetail),
        (status = 403, description = "Pagamento de outra conta"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ViewPayments>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.payment_service.detail(&user, id).await?;
    Ok(ApiResponse::ok("Payment retrieved", detail))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}/receipt",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Recibo em PDF"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn payment_receipt(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<ViewPayments>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.payment_service.detail(&user, id).await?;
    let filename = format!("attachment; filename=\"recibo_{}.pdf\"", detail.payment.transaction_ref);

    let pdf_bytes = app_state.document_service.render_receipt(detail).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, filename),
    ];
    Ok((headers, pdf_bytes))
}
