// src/db/reservation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reservation::{Reservation, ReservationStatus},
};

const RESERVATION_COLUMNS: &str = "id, table_id, account_id, customer_name, customer_phone, \
                                   reservation_time, number_of_guests, status, created_at, updated_at";

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        table_id: Uuid,
        account_id: Option<Uuid>,
        customer_name: Option<&str>,
        customer_phone: Option<&str>,
        reservation_time: DateTime<Utc>,
        number_of_guests: i32,
    ) -> Result<Reservation, AppError> {
        let sql = format!(
            r#"
            INSERT INTO reservations
                (table_id, account_id, customer_name, customer_phone, reservation_time, number_of_guests)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RESERVATION_COLUMNS}
            "#
        );
        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(table_id)
            .bind(account_id)
            .bind(customer_name)
            .bind(customer_phone)
            .bind(reservation_time)
            .bind(number_of_guests)
            .fetch_one(&self.pool)
            .await?;
        Ok(reservation)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1");
        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reservation)
    }

    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE");
        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(reservation)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {RESERVATION_COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(reservation)
    }

    /// `owner` = None lista todas (visão do gerente).
    pub async fn list(
        &self,
        owner: Option<Uuid>,
        status: Option<ReservationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Reservation>, i64), AppError> {
        const FILTER: &str = "($1::uuid IS NULL OR account_id = $1) \
                              AND ($2::reservation_status IS NULL OR status = $2)";

        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE {FILTER} \
             ORDER BY reservation_time DESC LIMIT $3 OFFSET $4"
        );
        let reservations = sqlx::query_as::<_, Reservation>(&sql)
            .bind(owner)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM reservations WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
