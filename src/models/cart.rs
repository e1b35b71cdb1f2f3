// src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub dish_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

// Linha do carrinho já juntada com o prato (pratos apagados não aparecem).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: Uuid,
    pub dish_id: Uuid,
    pub dish_name: String,
    pub dish_image: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: Uuid,
    pub items: Vec<CartLine>,
    pub total_items: i64,
    pub total: Decimal,
}

impl CartView {
    pub fn new(cart_id: Uuid, items: Vec<CartLine>) -> Self {
        let total_items = items.iter().map(|l| i64::from(l.quantity)).sum();
        let total = items.iter().map(|l| l.line_total).sum();
        Self {
            cart_id,
            items,
            total_items,
            total,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemPayload {
    pub dish_id: Uuid,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    #[schema(example = 1)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemPayload {
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            item_id: Uuid::new_v4(),
            dish_id: Uuid::new_v4(),
            dish_name: "dish".into(),
            dish_image: "default-dish.jpg".into(),
            unit_price: price,
            quantity,
            line_total: price * Decimal::from(quantity),
        }
    }

    #[test]
    fn cart_view_sums_lines() {
        let view = CartView::new(
            Uuid::new_v4(),
            vec![line(Decimal::from(10), 2), line(Decimal::from(5), 1)],
        );
        assert_eq!(view.total, Decimal::from(25));
        assert_eq!(view.total_items, 3);
    }

    #[test]
    fn empty_cart_has_zero_total() {
        let view = CartView::new(Uuid::new_v4(), vec![]);
        assert_eq!(view.total, Decimal::ZERO);
        assert_eq!(view.total_items, 0);
    }
}
