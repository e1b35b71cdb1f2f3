// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::order::{Order, OrderItemDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[schema(example = "TXN-4F2A9C0B71DE")]
    pub transaction_ref: String,
    #[schema(example = "25.00")]
    pub amount: Decimal,
    #[schema(example = "0.00")]
    pub discount: Decimal,
    pub user_coupon_id: Option<Uuid>,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentPayload {
    pub order_id: Uuid,
    pub method: PaymentMethod,
    pub coupon_id: Option<Uuid>,
    #[validate(length(min = 1, max = 64))]
    pub user_coupon_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub order: Order,
    pub applied_discount: Decimal,
    pub final_amount: Decimal,
    /// `true` quando o pedido já tinha um pagamento concluído.
    pub already_paid: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetail {
    pub payment: Payment,
    pub order: Option<Order>,
    pub items: Vec<OrderItemDetail>,
    pub total: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentListQuery {
    pub order_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Origem do desconto já resolvida.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountSource {
    None,
    Coupon { coupon_id: Uuid, amount: Decimal },
    UserCoupon { user_coupon_id: Uuid, amount: Decimal },
}

impl DiscountSource {
    pub fn face_value(&self) -> Decimal {
        match self {
            DiscountSource::None => Decimal::ZERO,
            DiscountSource::Coupon { amount, .. } | DiscountSource::UserCoupon { amount, .. } => *amount,
        }
    }
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// desconto = min(valor do cupom, base)
pub fn capped_discount(face_value: Decimal, base_amount: Decimal) -> Decimal {
    face_value.min(base_amount).max(Decimal::ZERO)
}

/// valor final = round2(max(0, base − desconto))
pub fn final_amount(base_amount: Decimal, discount: Decimal) -> Decimal {
    round2((base_amount - discount).max(Decimal::ZERO))
}

pub fn generate_transaction_ref() -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("TXN-{}", &raw[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_never_exceeds_base() {
        assert_eq!(capped_discount(Decimal::from(30), Decimal::from(25)), Decimal::from(25));
        assert_eq!(capped_discount(Decimal::from(5), Decimal::from(25)), Decimal::from(5));
        assert_eq!(capped_discount(Decimal::from(-5), Decimal::from(25)), Decimal::ZERO);
    }

    #[test]
    fn final_amount_is_clamped_and_rounded() {
        assert_eq!(final_amount(Decimal::from(25), Decimal::ZERO), Decimal::from(25));
        assert_eq!(final_amount(Decimal::from(10), Decimal::from(40)), Decimal::ZERO);
        // 10.005 arredonda para cima
        assert_eq!(
            final_amount(Decimal::new(10_005, 3), Decimal::ZERO),
            Decimal::new(1001, 2)
        );
    }

    #[test]
    fn round2_keeps_two_places() {
        assert_eq!(round2(Decimal::new(12_344, 3)), Decimal::new(1234, 2));
        assert_eq!(round2(Decimal::new(-12_345, 3)), Decimal::new(-1235, 2));
    }

    #[test]
    fn discount_source_face_value() {
        assert_eq!(DiscountSource::None.face_value(), Decimal::ZERO);
        let id = Uuid::new_v4();
        let src = DiscountSource::UserCoupon {
            user_coupon_id: id,
            amount: Decimal::from(7),
        };
        assert_eq!(src.face_value(), Decimal::from(7));
    }

    #[test]
    fn transaction_ref_format() {
        let r = generate_transaction_ref();
        assert!(r.starts_with("TXN-"));
        assert_eq!(r.len(), 16);
        assert!(r[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(r, generate_transaction_ref());
    }
}
