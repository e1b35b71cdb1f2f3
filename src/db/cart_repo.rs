// src/db/cart_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        cart::{Cart, CartItem, CartLine},
        menu::MAX_LINE_QUANTITY,
    },
};

#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// O carrinho "ativo" é o mais recente da conta.
    pub async fn find_latest<'e, E>(&self, executor: E, account_id: Uuid) -> Result<Option<Cart>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, account_id, created_at FROM carts \
             WHERE account_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(executor)
        .await?;
        Ok(cart)
    }

    pub async fn create(&self, account_id: Uuid) -> Result<Cart, AppError> {
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (account_id) VALUES ($1) RETURNING id, account_id, created_at",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(cart)
    }

    // Upsert atômico: adicionar o mesmo prato soma a quantidade na mesma linha.
    // Se a soma passar do teto a linha fica intacta.
    pub async fn upsert_item(
        &self,
        cart_id: Uuid,
        dish_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, AppError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (cart_id, dish_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, dish_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            WHERE cart_items.quantity + EXCLUDED.quantity <= $4
            RETURNING id, cart_id, dish_id, quantity, created_at
            "#,
        )
        .bind(cart_id)
        .bind(dish_id)
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .fetch_optional(&self.pool)
        .await?;
        item.ok_or(AppError::QuantityTooLarge(MAX_LINE_QUANTITY))
    }

    // Dono verificado na mesma instrução via carrinho pai.
    pub async fn set_item_quantity(
        &self,
        item_id: Uuid,
        account_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items ci SET quantity = $3
            FROM carts c
            WHERE ci.id = $1 AND ci.cart_id = c.id AND c.account_id = $2
            RETURNING ci.id, ci.cart_id, ci.dish_id, ci.quantity, ci.created_at
            "#,
        )
        .bind(item_id)
        .bind(account_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, item_id: Uuid, account_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM cart_items ci USING carts c \
             WHERE ci.id = $1 AND ci.cart_id = c.id AND c.account_id = $2",
        )
        .bind(item_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Linhas com prato apagado são descartadas silenciosamente.
    pub async fn list_lines<'e, E>(&self, executor: E, cart_id: Uuid) -> Result<Vec<CartLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT
                ci.id AS item_id,
                ci.dish_id,
                d.name AS dish_name,
                d.image AS dish_image,
                d.price AS unit_price,
                ci.quantity,
                d.price * ci.quantity AS line_total
            FROM cart_items ci
            JOIN dishes d ON d.id = ci.dish_id
            WHERE ci.cart_id = $1 AND d.is_deleted = FALSE
            ORDER BY ci.created_at
            "#,
        )
        .bind(cart_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    // Itens caem em cascata.
    pub async fn delete_cart<'e, E>(&self, executor: E, cart_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
