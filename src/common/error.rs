// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::{order::OrderStatus, reservation::ReservationStatus};

// Todas as falhas de domínio como variantes tipadas.
// O texto do `#[error]` é exatamente a mensagem devolvida ao cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Quantity must be a positive integer")]
    InvalidQuantity,

    #[error("Quantity cannot exceed {0}")]
    QuantityTooLarge(i32),

    // --- Contas / Auth ---
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Account not found")]
    AccountNotFound,

    // --- Cardápio ---
    #[error("Dish not found")]
    DishNotFound,

    #[error("Dish {0} is not available")]
    DishUnavailable(String),

    #[error("Dish {0} has insufficient ingredients")]
    DishInsufficientIngredients(String),

    #[error("Dish name already exists")]
    DishNameAlreadyExists,

    // --- Carrinho / Pedidos ---
    #[error("Cart is empty")]
    CartEmpty,

    #[error("Cart item not found")]
    CartItemNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Order item not found")]
    OrderItemNotFound,

    #[error("Order can only be modified while Pending")]
    OrderNotPending,

    #[error("Only completed or cancelled orders can be deleted")]
    OrderNotClosed,

    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("You do not have access to this order")]
    OrderForbidden,

    // --- Mesas ---
    #[error("Table not found")]
    TableNotFound,

    #[error("Table is not available")]
    TableUnavailable,

    // --- Cupons ---
    #[error("Coupon not found")]
    CouponNotFound,

    #[error("Coupon expired")]
    CouponExpired,

    #[error("Coupon not available")]
    CouponUnavailable,

    #[error("UserCoupon not found")]
    UserCouponNotFound,

    #[error("UserCoupon does not belong to user")]
    UserCouponNotOwned,

    #[error("UserCoupon is not available")]
    UserCouponUnavailable,

    #[error("UserCoupon expired")]
    UserCouponExpired,

    // --- Pagamentos / Pontos ---
    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Insufficient points")]
    InsufficientPoints,

    #[error("Could not generate a unique coupon code")]
    CouponCodeGenerationFailed,

    // --- Reservas ---
    #[error("Reservation not found")]
    ReservationNotFound,

    #[error("Reservation time must be in the future")]
    ReservationTimeInPast,

    #[error("Reservations can only be cancelled within 1 hour of booking")]
    ReservationCancelWindowExpired,

    #[error("You do not have access to this reservation")]
    ReservationForbidden,

    #[error("Cannot change reservation status from {from} to {to}")]
    InvalidReservationTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    // --- Favoritos / Incidentes / Chat ---
    #[error("Dish is already in favorites")]
    FavoriteAlreadyExists,

    #[error("Favorite not found")]
    FavoriteNotFound,

    #[error("Incident report not found")]
    IncidentReportNotFound,

    #[error("Receiver not found")]
    ReceiverNotFound,

    // --- Infra ---
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Font not found: {0}")]
    FontNotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        use AppError::*;

        match self {
            ValidationError(_)
            | BadRequest(_)
            | InvalidQuantity
            | QuantityTooLarge(_)
            | WrongPassword
            | DishUnavailable(_)
            | DishInsufficientIngredients(_)
            | CartEmpty
            | OrderNotPending
            | OrderNotClosed
            | InvalidStatusTransition { .. }
            | TableUnavailable
            | CouponExpired
            | CouponUnavailable
            | UserCouponUnavailable
            | UserCouponExpired
            | InsufficientPoints
            | ReservationTimeInPast
            | ReservationCancelWindowExpired
            | InvalidReservationTransition { .. } => StatusCode::BAD_REQUEST,

            InvalidCredentials | InvalidToken => StatusCode::UNAUTHORIZED,

            Forbidden(_)
            | OrderForbidden
            | UserCouponNotOwned
            | ReservationForbidden => StatusCode::FORBIDDEN,

            AccountNotFound
            | DishNotFound
            | CartItemNotFound
            | OrderNotFound
            | OrderItemNotFound
            | TableNotFound
            | CouponNotFound
            | UserCouponNotFound
            | PaymentNotFound
            | ReservationNotFound
            | FavoriteNotFound
            | IncidentReportNotFound
            | ReceiverNotFound => StatusCode::NOT_FOUND,

            EmailAlreadyExists | DishNameAlreadyExists | FavoriteAlreadyExists => {
                StatusCode::CONFLICT
            }

            CouponCodeGenerationFailed
            | DatabaseError(_)
            | InternalServerError(_)
            | BcryptError(_)
            | JwtError(_)
            | FontNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "message": "One or more fields are invalid",
                "details": details,
            }));
            return (status, body).into_response();
        }

        // Erros 500 vão para o log com detalhe; o cliente recebe só a mensagem genérica.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "success": false, "message": message }));
        (status, body).into_response()
    }
}

/// `true` quando o erro do banco é violação de UNIQUE.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_messages_are_preserved() {
        assert_eq!(AppError::OrderNotFound.to_string(), "Order not found");
        assert_eq!(AppError::CouponUnavailable.to_string(), "Coupon not available");
        assert_eq!(
            AppError::UserCouponNotOwned.to_string(),
            "UserCoupon does not belong to user"
        );
        assert_eq!(
            AppError::UserCouponUnavailable.to_string(),
            "UserCoupon is not available"
        );
        assert_eq!(AppError::InsufficientPoints.to_string(), "Insufficient points");
    }

    #[test]
    fn business_errors_map_to_client_statuses() {
        assert_eq!(AppError::InsufficientPoints.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::QuantityTooLarge(1000).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::QuantityTooLarge(1000).to_string(), "Quantity cannot exceed 1000");
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::UserCouponNotOwned.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::OrderNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidStatusTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Pending,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn infrastructure_errors_are_500() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AppError::InternalServerError(anyhow::anyhow!("boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = AppError::InvalidStatusTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Preparing,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change order status from Cancelled to Preparing"
        );
    }
}
