// src/db/account_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{is_unique_violation, AppError},
    models::account::{Account, Role},
};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, phone, address, image, role, \
                               is_deleted, deleted_at, created_at, updated_at";

// Repositório de contas, responsável pela tabela 'accounts'
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Contas apagadas continuam na tabela, mas não fazem login.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 AND is_deleted = FALSE"
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_active_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND is_deleted = FALSE"
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(account)
    }

    // E-mail duplicado vira 409 em vez de 500.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        role: Role,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO accounts (email, password_hash, name, phone, address, role)
            VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''), $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(name)
            .bind(phone)
            .bind(address)
            .bind(role)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::EmailAlreadyExists
                } else {
                    AppError::DatabaseError(e)
                }
            })
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        image: Option<&str>,
    ) -> Result<Option<Account>, AppError> {
        let sql = format!(
            r#"
            UPDATE accounts SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                image = COALESCE($5, image),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(name)
            .bind(phone)
            .bind(address)
            .bind(image)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE accounts SET password_hash = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(
        &self,
        role: Option<Role>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Account>, i64), AppError> {
        let sql = format!(
            r#"
            SELECT {ACCOUNT_COLUMNS} FROM accounts
            WHERE is_deleted = FALSE AND ($1::account_role IS NULL OR role = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounts \
             WHERE is_deleted = FALSE AND ($1::account_role IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok((accounts, total))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE accounts SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
