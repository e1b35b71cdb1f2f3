// src/db/reward_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reward::{RewardHistory, RewardPoint},
};

#[derive(Clone)]
pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cria a carteira com saldo zero no primeiro uso.
    pub async fn increment<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        points: i32,
    ) -> Result<RewardPoint, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let wallet = sqlx::query_as::<_, RewardPoint>(
            r#"
            INSERT INTO reward_points (account_id, points)
            VALUES ($1, $2)
            ON CONFLICT (account_id)
            DO UPDATE SET points = reward_points.points + EXCLUDED.points, updated_at = NOW()
            RETURNING id, account_id, points, updated_at
            "#,
        )
        .bind(account_id)
        .bind(points)
        .fetch_one(executor)
        .await?;
        Ok(wallet)
    }

    /// Débito guardado: só casa se o saldo cobrir. `None` = saldo insuficiente.
    pub async fn decrement_if_sufficient<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        points: i32,
    ) -> Result<Option<RewardPoint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let wallet = sqlx::query_as::<_, RewardPoint>(
            r#"
            UPDATE reward_points
            SET points = points - $2, updated_at = NOW()
            WHERE account_id = $1 AND points >= $2
            RETURNING id, account_id, points, updated_at
            "#,
        )
        .bind(account_id)
        .bind(points)
        .fetch_optional(executor)
        .await?;
        Ok(wallet)
    }

    pub async fn append_history<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        points_change: i32,
        action: &str,
    ) -> Result<RewardHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, RewardHistory>(
            r#"
            INSERT INTO reward_history (account_id, points_change, action)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, points_change, action, created_at
            "#,
        )
        .bind(account_id)
        .bind(points_change)
        .bind(action)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn balance(&self, account_id: Uuid) -> Result<i32, AppError> {
        let points: Option<i32> =
            sqlx::query_scalar("SELECT points FROM reward_points WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(points.unwrap_or(0))
    }

    pub async fn list_history(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RewardHistory>, i64), AppError> {
        let entries = sqlx::query_as::<_, RewardHistory>(
            r#"
            SELECT id, account_id, points_change, action, created_at
            FROM reward_history
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reward_history WHERE account_id = $1")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((entries, total))
    }
}
