// src/models/coupon.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- Cupom compartilhado ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    #[schema(example = "15.00")]
    pub discount_amount: Decimal,
    pub expiration_date: DateTime<Utc>,
    pub times_used: i32,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }

    /// Cupom apagado não pode ser usado; vencido também não.
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.is_deleted {
            return Err(AppError::CouponUnavailable);
        }
        if self.is_expired(now) {
            return Err(AppError::CouponExpired);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponView {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub is_expired: bool,
}

impl CouponView {
    pub fn new(coupon: Coupon, now: DateTime<Utc>) -> Self {
        let is_expired = coupon.is_expired(now);
        Self { coupon, is_expired }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponPayload {
    #[schema(example = "15.00")]
    pub discount_amount: Decimal,
    pub expiration_date: DateTime<Utc>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponPayload {
    pub discount_amount: Option<Decimal>,
    pub expiration_date: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CouponListQuery {
    /// Busca na descrição
    pub q: Option<String>,
}

// --- Cupom pessoal (resgatado com pontos) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_coupon_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserCouponStatus {
    Unused,
    Used,
    Expired,
    Canceled,
}

impl fmt::Display for UserCouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserCouponStatus::Unused => "unused",
            UserCouponStatus::Used => "used",
            UserCouponStatus::Expired => "expired",
            UserCouponStatus::Canceled => "canceled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCoupon {
    pub id: Uuid,
    pub account_id: Uuid,
    #[schema(example = "180.00")]
    pub discount_amount: Decimal,
    pub description: Option<String>,
    #[schema(example = "UC-482913-K7PQ2Z")]
    pub code: String,
    pub status: UserCouponStatus,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserCoupon {
    /// Regras de resgate: dono, status `unused` e validade.
    pub fn ensure_redeemable_by(&self, account_id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.account_id != account_id {
            return Err(AppError::UserCouponNotOwned);
        }
        if self.status != UserCouponStatus::Unused {
            return Err(AppError::UserCouponUnavailable);
        }
        if self.expires_at < now {
            return Err(AppError::UserCouponExpired);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyCouponsQuery {
    pub status: Option<UserCouponStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(expiration_date: DateTime<Utc>) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4(),
            discount_amount: Decimal::from(10),
            expiration_date,
            times_used: 0,
            description: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user_coupon(owner: Uuid, status: UserCouponStatus, expires_at: DateTime<Utc>) -> UserCoupon {
        let now = Utc::now();
        UserCoupon {
            id: Uuid::new_v4(),
            account_id: owner,
            discount_amount: Decimal::from(100),
            description: None,
            code: "UC-000001-ABCDEF".into(),
            status,
            issued_at: now,
            expires_at,
            used_at: None,
            created_at: now,
        }
    }

    #[test]
    fn valid_coupon_is_usable() {
        let now = Utc::now();
        assert!(coupon(now + Duration::days(1)).ensure_usable(now).is_ok());
    }

    #[test]
    fn expired_coupon_is_rejected() {
        let now = Utc::now();
        let c = coupon(now - Duration::seconds(1));
        assert!(matches!(c.ensure_usable(now), Err(AppError::CouponExpired)));
        assert!(CouponView::new(c, now).is_expired);
    }

    #[test]
    fn deleted_coupon_is_not_available() {
        let now = Utc::now();
        let mut c = coupon(now + Duration::days(1));
        c.is_deleted = true;
        assert!(matches!(c.ensure_usable(now), Err(AppError::CouponUnavailable)));
    }

    #[test]
    fn user_coupon_checks_owner_first() {
        let now = Utc::now();
        let uc = user_coupon(Uuid::new_v4(), UserCouponStatus::Used, now - Duration::days(1));
        assert!(matches!(
            uc.ensure_redeemable_by(Uuid::new_v4(), now),
            Err(AppError::UserCouponNotOwned)
        ));
    }

    #[test]
    fn used_user_coupon_is_not_available() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let uc = user_coupon(owner, UserCouponStatus::Used, now + Duration::days(1));
        let err = uc.ensure_redeemable_by(owner, now).unwrap_err();
        assert_eq!(err.to_string(), "UserCoupon is not available");
    }

    #[test]
    fn expired_user_coupon_is_rejected() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let uc = user_coupon(owner, UserCouponStatus::Unused, now - Duration::minutes(1));
        assert!(matches!(
            uc.ensure_redeemable_by(owner, now),
            Err(AppError::UserCouponExpired)
        ));
        let fresh = user_coupon(owner, UserCouponStatus::Unused, now + Duration::minutes(1));
        assert!(fresh.ensure_redeemable_by(owner, now).is_ok());
    }

    #[test]
    fn status_is_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&UserCouponStatus::Unused).unwrap(),
            "\"unused\""
        );
        assert_eq!(UserCouponStatus::Canceled.to_string(), "canceled");
    }
}
