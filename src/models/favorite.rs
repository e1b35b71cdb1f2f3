// src/models/favorite.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::menu::{DishStatus, IngredientStatus};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub account_id: Uuid,
    pub dish_id: Uuid,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Favorito com os dados do prato
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDish {
    pub favorite_id: Uuid,
    pub dish_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub dish_type: String,
    pub price: Decimal,
    pub image: String,
    pub status: DishStatus,
    pub ingredient_status: IngredientStatus,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoritePayload {
    pub dish_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteCount {
    pub count: i64,
}
