// src/models/order.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "order_type")]
pub enum OrderType {
    #[default]
    #[serde(rename = "Dine-in")]
    #[sqlx(rename = "Dine-in")]
    DineIn,
    Takeaway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Tabela de transições do ciclo de vida do pedido.
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Preparing, Ready, Completed, Cancelled],
            Preparing => &[Ready, Completed, Cancelled],
            Ready => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn ensure_transition(&self, next: OrderStatus) -> Result<(), AppError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::InvalidStatusTransition {
                from: *self,
                to: next,
            })
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub customer_phone: Option<String>,
    pub table_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub description: String,
    #[schema(example = "25.00")]
    pub total: Decimal,
    #[schema(example = "25.00")]
    pub final_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Pedido com dono só é visível/alterável pelo próprio dono. Pedido de convidado é aberto.
    pub fn ensure_access(&self, actor: Option<&AuthenticatedUser>) -> Result<(), AppError> {
        match self.account_id {
            None => Ok(()),
            Some(owner) if actor.is_some_and(|a| a.id == owner) => Ok(()),
            Some(_) => Err(AppError::OrderForbidden),
        }
    }

    /// Exclusão de histórico exige dono explícito.
    pub fn ensure_owned_by(&self, account_id: Uuid) -> Result<(), AppError> {
        if self.account_id == Some(account_id) {
            Ok(())
        } else {
            Err(AppError::OrderForbidden)
        }
    }

    pub fn ensure_pending(&self) -> Result<(), AppError> {
        if self.status == OrderStatus::Pending {
            Ok(())
        } else {
            Err(AppError::OrderNotPending)
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub dish_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

// Item do pedido com dados do prato e total da linha.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub dish_id: Uuid,
    pub dish_name: String,
    pub dish_image: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderMenu {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub item_count: i64,
}

impl OrderMenu {
    pub fn new(order: Order, items: Vec<OrderItemDetail>) -> Self {
        let item_count = items.iter().map(|i| i64::from(i.quantity)).sum();
        Self {
            order,
            items,
            item_count,
        }
    }
}

/// Linha validada pronta para virar `order_items`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewOrderLine {
    pub dish_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// total = soma(preço unitário × quantidade)
pub fn order_total(lines: &[NewOrderLine]) -> Decimal {
    lines
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.quantity))
        .sum()
}

/// Junta linhas repetidas do mesmo prato somando as quantidades.
pub fn merge_lines(lines: Vec<NewOrderLine>) -> Vec<NewOrderLine> {
    let mut merged: Vec<NewOrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.dish_id == line.dish_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub dish_id: Uuid,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "Order must have at least one item"), nested)]
    pub items: Vec<OrderLinePayload>,
    pub table_id: Option<Uuid>,
    #[validate(length(min = 8, max = 20, message = "Invalid phone number"))]
    pub customer_phone: Option<String>,
    pub order_type: Option<OrderType>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderFromCartPayload {
    pub table_id: Option<Uuid>,
    pub order_type: Option<OrderType>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderItemPayload {
    pub dish_id: Uuid,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderItemPayload {
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderHistoryQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewOrdersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::Role;

    fn order(owner: Option<Uuid>, status: OrderStatus) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            account_id: owner,
            customer_phone: None,
            table_id: None,
            coupon_id: None,
            order_type: OrderType::DineIn,
            status,
            description: String::new(),
            total: Decimal::ZERO,
            final_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: Uuid) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            role: Role::Customer,
        }
    }

    #[test]
    fn pending_can_move_anywhere_forward() {
        for next in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(OrderStatus::Pending.can_transition_to(next), "{next}");
        }
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn kitchen_hand_off_is_allowed() {
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn terminal_states_reject_every_move() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(from.allowed_next().is_empty());
            assert!(matches!(
                from.ensure_transition(OrderStatus::Pending),
                Err(AppError::InvalidStatusTransition { .. })
            ));
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let lines = [
            NewOrderLine {
                dish_id: Uuid::new_v4(),
                quantity: 2,
                unit_price: Decimal::from(10),
            },
            NewOrderLine {
                dish_id: Uuid::new_v4(),
                quantity: 1,
                unit_price: Decimal::from(5),
            },
        ];
        assert_eq!(order_total(&lines), Decimal::from(25));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn repeated_dish_lines_are_merged() {
        let dish = Uuid::new_v4();
        let other = Uuid::new_v4();
        let price = Decimal::new(350, 2);
        let merged = merge_lines(vec![
            NewOrderLine { dish_id: dish, quantity: 1, unit_price: price },
            NewOrderLine { dish_id: other, quantity: 4, unit_price: price },
            NewOrderLine { dish_id: dish, quantity: 2, unit_price: price },
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].quantity, 3);
        assert_eq!(merged[1].quantity, 4);
    }

    #[test]
    fn merged_quantity_saturates_instead_of_wrapping() {
        let dish = Uuid::new_v4();
        let price = Decimal::ONE;
        let merged = merge_lines(vec![
            NewOrderLine { dish_id: dish, quantity: i32::MAX, unit_price: price },
            NewOrderLine { dish_id: dish, quantity: 5, unit_price: price },
        ]);
        assert_eq!(merged[0].quantity, i32::MAX);
    }

    #[test]
    fn create_order_payload_bounds_line_quantity() {
        let ok: CreateOrderPayload = serde_json::from_value(serde_json::json!({
            "items": [{ "dishId": Uuid::new_v4(), "quantity": 1000 }]
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let too_many: CreateOrderPayload = serde_json::from_value(serde_json::json!({
            "items": [{ "dishId": Uuid::new_v4(), "quantity": 1001 }]
        }))
        .unwrap();
        assert!(too_many.validate().is_err());

        let empty: CreateOrderPayload =
            serde_json::from_value(serde_json::json!({ "items": [] })).unwrap();
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn guest_orders_are_open() {
        let o = order(None, OrderStatus::Pending);
        assert!(o.ensure_access(None).is_ok());
        assert!(o.ensure_access(Some(&user(Uuid::new_v4()))).is_ok());
    }

    #[test]
    fn owned_orders_are_owner_only() {
        let owner = Uuid::new_v4();
        let o = order(Some(owner), OrderStatus::Pending);
        assert!(o.ensure_access(Some(&user(owner))).is_ok());
        assert!(matches!(o.ensure_access(None), Err(AppError::OrderForbidden)));
        assert!(matches!(
            o.ensure_access(Some(&user(Uuid::new_v4()))),
            Err(AppError::OrderForbidden)
        ));
    }

    #[test]
    fn item_edits_require_pending() {
        assert!(order(None, OrderStatus::Pending).ensure_pending().is_ok());
        assert!(matches!(
            order(None, OrderStatus::Preparing).ensure_pending(),
            Err(AppError::OrderNotPending)
        ));
    }

    #[test]
    fn order_type_uses_hyphenated_label() {
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"Dine-in\"");
    }
}
