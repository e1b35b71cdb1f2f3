// src/models/reward.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::coupon::UserCoupon;

// Regras de conversão de pontos
pub const REWARD_POINT_VALUE: i64 = 100;
pub const BULK_THRESHOLD: i32 = 100;
pub const BULK_MULTIPLIER: Decimal = Decimal::from_parts(12, 0, 0, false, 1); // 1.2
pub const DEFAULT_EXPIRE_DAYS: i64 = 7;
pub const BULK_EXTRA_EXPIRE_DAYS: i64 = 7;
pub const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardPoint {
    pub id: Uuid,
    pub account_id: Uuid,
    #[schema(example = 150)]
    pub points: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardHistory {
    pub id: Uuid,
    pub account_id: Uuid,
    #[schema(example = -150)]
    pub points_change: i32,
    #[schema(example = "Redeem points")]
    pub action: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceView {
    pub points: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarnPointsPayload {
    /// Conta creditada; omitido = quem chamou
    pub account_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Points must be a positive integer"))]
    pub points: i32,
    #[validate(length(min = 1, max = 200))]
    pub action: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemPointsPayload {
    #[validate(range(min = 1, message = "Points must be a positive integer"))]
    pub points: i32,
    #[validate(length(min = 1, max = 200))]
    pub action: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 365))]
    pub expiration_days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarnResult {
    pub balance: RewardPoint,
    pub history: RewardHistory,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResult {
    pub user_coupon: UserCoupon,
    pub remaining_points: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Resultado da conversão de pontos em cupom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionTerms {
    pub discount_amount: Decimal,
    pub expiration_days: i64,
}

/// Converte pontos em desconto. Acima do limiar aplica bônus e prazo extra.
pub fn compute_redemption(points: i32, expiration_days: Option<i64>) -> RedemptionTerms {
    let base = Decimal::from(i64::from(points) * REWARD_POINT_VALUE);
    let mut days = expiration_days.unwrap_or(DEFAULT_EXPIRE_DAYS);

    let discount_amount = if points > BULK_THRESHOLD {
        days += BULK_EXTRA_EXPIRE_DAYS;
        (base * BULK_MULTIPLIER).floor()
    } else {
        base
    };

    RedemptionTerms {
        discount_amount,
        expiration_days: days,
    }
}

/// Formato: UC-<6 dígitos>-<6 alfanuméricos maiúsculos>
pub fn generate_coupon_code() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut entropy = Uuid::new_v4().as_u128();
    let digits = entropy % 1_000_000;
    entropy /= 1_000_000;

    let suffix: String = (0..6)
        .map(|_| {
            let idx = (entropy % ALPHABET.len() as u128) as usize;
            entropy /= ALPHABET.len() as u128;
            ALPHABET[idx] as char
        })
        .collect();

    format!("UC-{:06}-{}", digits, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_redemption_gets_multiplier_and_extra_days() {
        let terms = compute_redemption(150, None);
        assert_eq!(terms.discount_amount, Decimal::from(18_000));
        assert_eq!(terms.expiration_days, DEFAULT_EXPIRE_DAYS + BULK_EXTRA_EXPIRE_DAYS);
    }

    #[test]
    fn threshold_itself_is_not_bulk() {
        let terms = compute_redemption(100, None);
        assert_eq!(terms.discount_amount, Decimal::from(10_000));
        assert_eq!(terms.expiration_days, 7);
    }

    #[test]
    fn bulk_discount_applies_just_above_threshold() {
        let amount = compute_redemption(101, None).discount_amount;
        assert_eq!(amount, Decimal::from(12_120));
        assert_eq!(amount.fract(), Decimal::ZERO);
    }

    #[test]
    fn custom_expiry_is_extended_for_bulk() {
        assert_eq!(compute_redemption(10, Some(30)).expiration_days, 30);
        assert_eq!(compute_redemption(200, Some(30)).expiration_days, 37);
    }

    #[test]
    fn coupon_code_has_expected_shape() {
        let code = generate_coupon_code();
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "UC");
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn multiplier_constant_is_one_point_two() {
        assert_eq!(BULK_MULTIPLIER.to_string(), "1.2");
    }
}
