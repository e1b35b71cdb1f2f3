// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{Payment, PaymentMethod},
};

const PAYMENT_COLUMNS: &str = "p.id, p.order_id, p.method, p.status, p.transaction_ref, p.amount, \
                               p.discount, p.user_coupon_id, p.payment_date, p.created_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_completed_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments p \
             WHERE p.order_id = $1 AND p.status = 'Completed' LIMIT 1"
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn insert_completed<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        method: PaymentMethod,
        transaction_ref: &str,
        amount: Decimal,
        discount: Decimal,
        user_coupon_id: Option<Uuid>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO payments AS p (order_id, method, status, transaction_ref, amount, discount, user_coupon_id)
            VALUES ($1, $2, 'Completed', $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(order_id)
            .bind(method)
            .bind(transaction_ref)
            .bind(amount)
            .bind(discount)
            .bind(user_coupon_id)
            .fetch_one(executor)
            .await?;
        Ok(payment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments p WHERE p.id = $1");
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payment)
    }

    /// Lista pagamentos concluídos. `owner` restringe aos pedidos da conta.
    pub async fn list_completed(
        &self,
        owner: Option<Uuid>,
        order_id: Option<Uuid>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payment>, i64), AppError> {
        const FILTER: &str = r#"
            FROM payments p
            LEFT JOIN orders o ON o.id = p.order_id
            WHERE p.status = 'Completed'
              AND ($1::uuid IS NULL OR o.account_id = $1)
              AND ($2::uuid IS NULL OR p.order_id = $2)
              AND ($3::timestamptz IS NULL OR p.payment_date >= $3)
              AND ($4::timestamptz IS NULL OR p.payment_date <= $4)
        "#;

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} {FILTER} ORDER BY p.payment_date DESC LIMIT $5 OFFSET $6"
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(owner)
            .bind(order_id)
            .bind(start_date)
            .bind(end_date)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner)
            .bind(order_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok((payments, total))
    }
}
