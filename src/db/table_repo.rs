// src/db/table_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::table::{DiningTable, TableStatus},
};

const TABLE_COLUMNS: &str =
    "id, seats, floor_number, status, is_deleted, deleted_at, created_at, updated_at";

#[derive(Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = $1");
        let table = sqlx::query_as::<_, DiningTable>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(table)
    }

    pub async fn list(&self) -> Result<Vec<DiningTable>, AppError> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE is_deleted = FALSE \
             ORDER BY floor_number, created_at"
        );
        let tables = sqlx::query_as::<_, DiningTable>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tables)
    }

    pub async fn create(
        &self,
        seats: i32,
        floor_number: i32,
        status: Option<TableStatus>,
    ) -> Result<DiningTable, AppError> {
        let sql = format!(
            "INSERT INTO dining_tables (seats, floor_number, status) \
             VALUES ($1, $2, COALESCE($3, 'Available'::table_status)) RETURNING {TABLE_COLUMNS}"
        );
        let table = sqlx::query_as::<_, DiningTable>(&sql)
            .bind(seats)
            .bind(floor_number)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(table)
    }

    pub async fn update(
        &self,
        id: Uuid,
        seats: Option<i32>,
        floor_number: Option<i32>,
        status: Option<TableStatus>,
    ) -> Result<Option<DiningTable>, AppError> {
        let sql = format!(
            r#"
            UPDATE dining_tables SET
                seats = COALESCE($2, seats),
                floor_number = COALESCE($3, floor_number),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {TABLE_COLUMNS}
            "#
        );
        let table = sqlx::query_as::<_, DiningTable>(&sql)
            .bind(id)
            .bind(seats)
            .bind(floor_number)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(table)
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: TableStatus) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE dining_tables SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE dining_tables SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
