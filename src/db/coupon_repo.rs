// src/db/coupon_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::coupon::{Coupon, UserCoupon, UserCouponStatus},
};

const COUPON_COLUMNS: &str = "id, discount_amount, expiration_date, times_used, description, \
                              is_deleted, deleted_at, created_at, updated_at";

const USER_COUPON_COLUMNS: &str = "id, account_id, discount_amount, description, code, status, \
                                   issued_at, expires_at, used_at, created_at";

#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CUPONS COMPARTILHADOS
    // =========================================================================

    /// Inclui apagados: quem chama decide se é "não encontrado" ou "indisponível".
    pub async fn find_coupon<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Coupon>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1");
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(coupon)
    }

    pub async fn find_active_coupon(&self, id: Uuid) -> Result<Option<Coupon>, AppError> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1 AND is_deleted = FALSE");
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(coupon)
    }

    pub async fn list_coupons(&self, q: Option<&str>) -> Result<Vec<Coupon>, AppError> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons \
             WHERE is_deleted = FALSE AND ($1::text IS NULL OR description ILIKE '%' || $1 || '%') \
             ORDER BY created_at DESC"
        );
        let coupons = sqlx::query_as::<_, Coupon>(&sql)
            .bind(q)
            .fetch_all(&self.pool)
            .await?;
        Ok(coupons)
    }

    pub async fn create_coupon(
        &self,
        discount_amount: Decimal,
        expiration_date: DateTime<Utc>,
        description: Option<&str>,
    ) -> Result<Coupon, AppError> {
        let sql = format!(
            "INSERT INTO coupons (discount_amount, expiration_date, description) \
             VALUES ($1, $2, $3) RETURNING {COUPON_COLUMNS}"
        );
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(discount_amount)
            .bind(expiration_date)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(coupon)
    }

    pub async fn update_coupon(
        &self,
        id: Uuid,
        discount_amount: Option<Decimal>,
        expiration_date: Option<DateTime<Utc>>,
        description: Option<&str>,
    ) -> Result<Option<Coupon>, AppError> {
        let sql = format!(
            r#"
            UPDATE coupons SET
                discount_amount = COALESCE($2, discount_amount),
                expiration_date = COALESCE($3, expiration_date),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {COUPON_COLUMNS}
            "#
        );
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(id)
            .bind(discount_amount)
            .bind(expiration_date)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(coupon)
    }

    pub async fn soft_delete_coupon(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE coupons SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_times_used<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE coupons SET times_used = times_used + 1, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  CUPONS PESSOAIS
    // =========================================================================

    pub async fn find_user_coupon_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<UserCoupon>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {USER_COUPON_COLUMNS} FROM user_coupons WHERE code = $1");
        let coupon = sqlx::query_as::<_, UserCoupon>(&sql)
            .bind(code)
            .fetch_optional(executor)
            .await?;
        Ok(coupon)
    }

    /// Consumo condicional: só marca como usado se ainda estiver `unused`.
    pub async fn mark_user_coupon_used<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE user_coupons SET status = 'used', used_at = NOW() \
             WHERE id = $1 AND status = 'unused'",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn code_exists<'e, E>(&self, executor: E, code: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_coupons WHERE code = $1)")
            .bind(code)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn insert_user_coupon<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        discount_amount: Decimal,
        description: Option<&str>,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UserCoupon, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO user_coupons (account_id, discount_amount, description, code, status, expires_at)
            VALUES ($1, $2, $3, $4, 'unused', $5)
            RETURNING {USER_COUPON_COLUMNS}
            "#
        );
        let coupon = sqlx::query_as::<_, UserCoupon>(&sql)
            .bind(account_id)
            .bind(discount_amount)
            .bind(description)
            .bind(code)
            .bind(expires_at)
            .fetch_one(executor)
            .await?;
        Ok(coupon)
    }

    pub async fn list_user_coupons(
        &self,
        account_id: Uuid,
        status: Option<UserCouponStatus>,
    ) -> Result<Vec<UserCoupon>, AppError> {
        let sql = format!(
            "SELECT {USER_COUPON_COLUMNS} FROM user_coupons \
             WHERE account_id = $1 AND ($2::user_coupon_status IS NULL OR status = $2) \
             ORDER BY issued_at DESC"
        );
        let coupons = sqlx::query_as::<_, UserCoupon>(&sql)
            .bind(account_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(coupons)
    }
}
