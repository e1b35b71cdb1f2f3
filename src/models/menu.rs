// src/models/menu.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "dish_status")]
pub enum DishStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ingredient_status")]
pub enum IngredientStatus {
    Sufficient,
    Insufficient,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    #[schema(example = "Pho Bo")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "Main course")]
    pub dish_type: String,
    #[schema(example = "12.50")]
    pub price: Decimal,
    pub description: String,
    #[schema(example = "default-dish.jpg")]
    pub image: String,
    pub status: DishStatus,
    pub ingredient_status: IngredientStatus,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dish {
    /// Um prato só entra em carrinho/pedido se estiver disponível e com ingredientes.
    pub fn ensure_orderable(&self) -> Result<(), AppError> {
        if self.is_deleted {
            return Err(AppError::DishNotFound);
        }
        if self.status != DishStatus::Available {
            return Err(AppError::DishUnavailable(self.name.clone()));
        }
        if self.ingredient_status != IngredientStatus::Sufficient {
            return Err(AppError::DishInsufficientIngredients(self.name.clone()));
        }
        Ok(())
    }
}

/// Teto por linha de carrinho/pedido, inclusive após somar inclusões repetidas.
pub const MAX_LINE_QUANTITY: i32 = 1000;

pub fn ensure_valid_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::InvalidQuantity);
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::QuantityTooLarge(MAX_LINE_QUANTITY));
    }
    Ok(())
}

pub fn ensure_non_negative(amount: Decimal, field: &str) -> Result<(), AppError> {
    if amount < Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "{} must be greater than or equal to 0",
            field
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishPayload {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type is required"))]
    pub dish_type: String,
    #[schema(example = "12.50")]
    pub price: Decimal,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<DishStatus>,
    pub ingredient_status: Option<IngredientStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub dish_type: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<DishStatus>,
    pub ingredient_status: Option<IngredientStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum DishSortBy {
    #[default]
    CreatedAt,
    Price,
    Name,
}

impl DishSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            DishSortBy::CreatedAt => "created_at",
            DishSortBy::Price => "price",
            DishSortBy::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DishListQuery {
    #[serde(rename = "type")]
    pub dish_type: Option<String>,
    pub status: Option<DishStatus>,
    pub ingredient_status: Option<IngredientStatus>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<DishSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DishSearchQuery {
    pub keyword: String,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(status: DishStatus, ingredient_status: IngredientStatus) -> Dish {
        let now = Utc::now();
        Dish {
            id: Uuid::new_v4(),
            name: "Pho Bo".into(),
            dish_type: "Main course".into(),
            price: Decimal::new(1250, 2),
            description: String::new(),
            image: "default-dish.jpg".into(),
            status,
            ingredient_status,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn available_dish_with_ingredients_is_orderable() {
        let d = dish(DishStatus::Available, IngredientStatus::Sufficient);
        assert!(d.ensure_orderable().is_ok());
    }

    #[test]
    fn unavailable_dish_is_rejected_by_name() {
        let d = dish(DishStatus::Unavailable, IngredientStatus::Sufficient);
        let err = d.ensure_orderable().unwrap_err();
        assert_eq!(err.to_string(), "Dish Pho Bo is not available");
    }

    #[test]
    fn insufficient_ingredients_are_rejected() {
        let d = dish(DishStatus::Available, IngredientStatus::Insufficient);
        assert!(matches!(
            d.ensure_orderable(),
            Err(AppError::DishInsufficientIngredients(_))
        ));
    }

    #[test]
    fn deleted_dish_counts_as_missing() {
        let mut d = dish(DishStatus::Available, IngredientStatus::Sufficient);
        d.is_deleted = true;
        assert!(matches!(d.ensure_orderable(), Err(AppError::DishNotFound)));
    }

    #[test]
    fn quantity_must_be_positive_and_bounded() {
        assert!(ensure_valid_quantity(1).is_ok());
        assert!(ensure_valid_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(matches!(ensure_valid_quantity(0), Err(AppError::InvalidQuantity)));
        assert!(matches!(ensure_valid_quantity(-3), Err(AppError::InvalidQuantity)));
        assert!(matches!(
            ensure_valid_quantity(MAX_LINE_QUANTITY + 1),
            Err(AppError::QuantityTooLarge(1000))
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(ensure_non_negative(Decimal::ZERO, "Price").is_ok());
        assert!(ensure_non_negative(Decimal::new(-1, 2), "Price").is_err());
    }

    #[test]
    fn sort_options_map_to_whitelisted_sql() {
        assert_eq!(DishSortBy::default().column(), "created_at");
        assert_eq!(DishSortBy::Price.column(), "price");
        assert_eq!(SortOrder::default().keyword(), "DESC");
        let s: DishSortBy = serde_json::from_str("\"createdAt\"").unwrap();
        assert_eq!(s, DishSortBy::CreatedAt);
    }
}
