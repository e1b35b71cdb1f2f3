// src/db/menu_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{is_unique_violation, AppError},
    models::menu::{Dish, DishListQuery, DishStatus, IngredientStatus},
};

const DISH_COLUMNS: &str = "id, name, dish_type, price, description, image, status, \
                            ingredient_status, is_deleted, deleted_at, created_at, updated_at";

const DISH_FILTER: &str = r#"
    is_deleted = FALSE
    AND ($1::text IS NULL OR dish_type = $1)
    AND ($2::dish_status IS NULL OR status = $2)
    AND ($3::ingredient_status IS NULL OR ingredient_status = $3)
    AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%' OR description ILIKE '%' || $4 || '%')
"#;

fn map_name_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::DishNameAlreadyExists
    } else {
        AppError::DatabaseError(e)
    }
}

#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca o prato (inclusive apagado) para validar pedidos dentro de transações.
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Dish>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1");
        let dish = sqlx::query_as::<_, Dish>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(dish)
    }

    pub async fn find_active(&self, id: Uuid) -> Result<Option<Dish>, AppError> {
        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1 AND is_deleted = FALSE");
        let dish = sqlx::query_as::<_, Dish>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dish)
    }

    pub async fn list(
        &self,
        query: &DishListQuery,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Dish>, i64), AppError> {
        // A ordenação vem de enums fechados, nunca do texto do cliente.
        let sort_column = query.sort_by.unwrap_or_default().column();
        let sort_order = query.sort_order.unwrap_or_default().keyword();
        let sql = format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE {DISH_FILTER} \
             ORDER BY {sort_column} {sort_order}, id LIMIT $5 OFFSET $6"
        );
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let dishes = sqlx::query_as::<_, Dish>(&sql)
            .bind(query.dish_type.as_deref())
            .bind(query.status)
            .bind(query.ingredient_status)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM dishes WHERE {DISH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.dish_type.as_deref())
            .bind(query.status)
            .bind(query.ingredient_status)
            .bind(search)
            .fetch_one(&self.pool)
            .await?;

        Ok((dishes, total))
    }

    pub async fn list_types(&self) -> Result<Vec<String>, AppError> {
        let types = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT dish_type FROM dishes WHERE is_deleted = FALSE ORDER BY dish_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    pub async fn featured(&self, limit: i64) -> Result<Vec<Dish>, AppError> {
        let sql = format!(
            "SELECT {DISH_COLUMNS} FROM dishes \
             WHERE is_deleted = FALSE AND status = 'Available' AND ingredient_status = 'Sufficient' \
             ORDER BY created_at DESC LIMIT $1"
        );
        let dishes = sqlx::query_as::<_, Dish>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(dishes)
    }

    pub async fn search(&self, keyword: &str, limit: i64) -> Result<Vec<Dish>, AppError> {
        let sql = format!(
            "SELECT {DISH_COLUMNS} FROM dishes \
             WHERE is_deleted = FALSE \
               AND (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%' \
                    OR dish_type ILIKE '%' || $1 || '%') \
             ORDER BY name LIMIT $2"
        );
        let dishes = sqlx::query_as::<_, Dish>(&sql)
            .bind(keyword)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(dishes)
    }

    pub async fn create(
        &self,
        name: &str,
        dish_type: &str,
        price: Decimal,
        description: Option<&str>,
        image: Option<&str>,
        status: Option<DishStatus>,
        ingredient_status: Option<IngredientStatus>,
    ) -> Result<Dish, AppError> {
        let sql = format!(
            r#"
            INSERT INTO dishes (name, dish_type, price, description, image, status, ingredient_status)
            VALUES (
                $1, $2, $3,
                COALESCE($4, ''),
                COALESCE($5, 'default-dish.jpg'),
                COALESCE($6, 'Available'::dish_status),
                COALESCE($7, 'Sufficient'::ingredient_status)
            )
            RETURNING {DISH_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Dish>(&sql)
            .bind(name)
            .bind(dish_type)
            .bind(price)
            .bind(description)
            .bind(image)
            .bind(status)
            .bind(ingredient_status)
            .fetch_one(&self.pool)
            .await
            .map_err(map_name_conflict)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        dish_type: Option<&str>,
        price: Option<Decimal>,
        description: Option<&str>,
        image: Option<&str>,
        status: Option<DishStatus>,
        ingredient_status: Option<IngredientStatus>,
    ) -> Result<Option<Dish>, AppError> {
        let sql = format!(
            r#"
            UPDATE dishes SET
                name = COALESCE($2, name),
                dish_type = COALESCE($3, dish_type),
                price = COALESCE($4, price),
                description = COALESCE($5, description),
                image = COALESCE($6, image),
                status = COALESCE($7, status),
                ingredient_status = COALESCE($8, ingredient_status),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {DISH_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Dish>(&sql)
            .bind(id)
            .bind(name)
            .bind(dish_type)
            .bind(price)
            .bind(description)
            .bind(image)
            .bind(status)
            .bind(ingredient_status)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_name_conflict)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE dishes SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
