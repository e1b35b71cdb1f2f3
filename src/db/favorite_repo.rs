// src/db/favorite_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::favorite::{Favorite, FavoriteDish},
};

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere ou restaura um favorito apagado. `None` = já existe um ativo.
    pub async fn add(&self, account_id: Uuid, dish_id: Uuid) -> Result<Option<Favorite>, AppError> {
        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (account_id, dish_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, dish_id)
            DO UPDATE SET is_deleted = FALSE, deleted_at = NULL, created_at = NOW()
            WHERE favorites.is_deleted = TRUE
            RETURNING id, account_id, dish_id, is_deleted, deleted_at, created_at
            "#,
        )
        .bind(account_id)
        .bind(dish_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    pub async fn remove(&self, account_id: Uuid, dish_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE favorites SET is_deleted = TRUE, deleted_at = NOW() \
             WHERE account_id = $1 AND dish_id = $2 AND is_deleted = FALSE",
        )
        .bind(account_id)
        .bind(dish_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self, account_id: Uuid) -> Result<Vec<FavoriteDish>, AppError> {
        let dishes = sqlx::query_as::<_, FavoriteDish>(
            r#"
            SELECT
                f.id AS favorite_id,
                d.id AS dish_id,
                d.name,
                d.dish_type,
                d.price,
                d.image,
                d.status,
                d.ingredient_status,
                f.created_at AS favorited_at
            FROM favorites f
            JOIN dishes d ON d.id = f.dish_id
            WHERE f.account_id = $1 AND f.is_deleted = FALSE AND d.is_deleted = FALSE
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    pub async fn exists(&self, account_id: Uuid, dish_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites \
             WHERE account_id = $1 AND dish_id = $2 AND is_deleted = FALSE)",
        )
        .bind(account_id)
        .bind(dish_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn count(&self, account_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM favorites f
            JOIN dishes d ON d.id = f.dish_id
            WHERE f.account_id = $1 AND f.is_deleted = FALSE AND d.is_deleted = FALSE
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
