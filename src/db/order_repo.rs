// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        menu::MAX_LINE_QUANTITY,
        order::{NewOrderLine, Order, OrderItem, OrderItemDetail, OrderStatus, OrderType},
    },
};

const ORDER_COLUMNS: &str = "id, account_id, customer_phone, table_id, coupon_id, order_type, \
                             status, description, total, final_price, created_at, updated_at";

// Mesmo filtro de recalculate_total: linhas de prato apagado não entram.
const ITEM_DETAIL_SELECT: &str = r#"
    SELECT
        oi.id, oi.order_id, oi.dish_id,
        d.name AS dish_name,
        d.image AS dish_image,
        oi.quantity,
        oi.unit_price,
        oi.unit_price * oi.quantity AS line_total
    FROM order_items oi
    JOIN dishes d ON d.id = oi.dish_id
    WHERE d.is_deleted = FALSE
"#;

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    /// Trava a linha do pedido até o fim da transação.
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        account_id: Option<Uuid>,
        customer_phone: Option<&str>,
        table_id: Option<Uuid>,
        order_type: OrderType,
        description: Option<&str>,
        total: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO orders (account_id, customer_phone, table_id, order_type, description, total, final_price)
            VALUES ($1, $2, $3, $4, COALESCE($5, ''), $6, $6)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(account_id)
            .bind(customer_phone)
            .bind(table_id)
            .bind(order_type)
            .bind(description)
            .bind(total)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }

    // Repetir o prato soma quantidade e mantém o preço congelado da primeira inclusão.
    // Se a soma passar do teto a linha fica intacta.
    pub async fn upsert_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        line: &NewOrderLine,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, dish_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (order_id, dish_id)
            DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity
            WHERE order_items.quantity + EXCLUDED.quantity <= $5
            RETURNING id, order_id, dish_id, quantity, unit_price, created_at
            "#,
        )
        .bind(order_id)
        .bind(line.dish_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(MAX_LINE_QUANTITY)
        .fetch_optional(executor)
        .await?;
        item.ok_or(AppError::QuantityTooLarge(MAX_LINE_QUANTITY))
    }

    pub async fn set_item_quantity<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            UPDATE order_items SET quantity = $3
            WHERE id = $2 AND order_id = $1
            RETURNING id, order_id, dish_id, quantity, unit_price, created_at
            "#,
        )
        .bind(order_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        item_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $2 AND order_id = $1")
            .bind(order_id)
            .bind(item_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soma novamente os itens sobreviventes (prato não apagado). final_price volta a ser o total.
    pub async fn recalculate_total<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH sums AS (
                SELECT COALESCE(SUM(oi.unit_price * oi.quantity), 0) AS total
                FROM order_items oi
                JOIN dishes d ON d.id = oi.dish_id
                WHERE oi.order_id = $1 AND d.is_deleted = FALSE
            )
            UPDATE orders SET
                total = sums.total,
                final_price = sums.total,
                updated_at = NOW()
            FROM sums
            WHERE orders.id = $1
            RETURNING {}
            "#,
            qualified_order_columns()
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }

    /// Fechamento pelo pagamento: preço final, cupom e status na mesma instrução.
    pub async fn settle<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        final_price: Decimal,
        coupon_id: Option<Uuid>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE orders SET
                final_price = $2,
                coupon_id = COALESCE($3, coupon_id),
                status = 'Completed',
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .bind(final_price)
            .bind(coupon_id)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }

    pub async fn delete_order(&self, order_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderItemDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{ITEM_DETAIL_SELECT} AND oi.order_id = $1 ORDER BY oi.created_at");
        let items = sqlx::query_as::<_, OrderItemDetail>(&sql)
            .bind(order_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    pub async fn list_items_for_orders(&self, order_ids: &[Uuid]) -> Result<Vec<OrderItemDetail>, AppError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{ITEM_DETAIL_SELECT} AND oi.order_id = ANY($1) ORDER BY oi.order_id, oi.created_at"
        );
        let items = sqlx::query_as::<_, OrderItemDetail>(&sql)
            .bind(order_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_by_account(
        &self,
        account_id: Uuid,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE account_id = $1 AND ($2::order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(account_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders \
             WHERE account_id = $1 AND ($2::order_status IS NULL OR status = $2)",
        )
        .bind(account_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((orders, total))
    }

    pub async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64), AppError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok((orders, total))
    }
}

// No UPDATE ... FROM as colunas precisam do prefixo da tabela.
fn qualified_order_columns() -> String {
    ORDER_COLUMNS
        .split(',')
        .map(|c| format!("orders.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_columns_are_prefixed() {
        let cols = qualified_order_columns();
        assert!(cols.starts_with("orders.id, orders.account_id"));
        assert!(cols.ends_with("orders.updated_at"));
        assert!(!cols.contains("orders. "));
    }
}
