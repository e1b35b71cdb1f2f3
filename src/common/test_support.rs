// src/common/test_support.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::{AppState, Config},
    middleware::auth::AuthenticatedUser,
    models::account::Role,
};

pub const TEST_JWT_SECRET: &str = "router-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        port: 0,
        db_max_connections: 1,
        jwt_expires_days: 1,
        font_dir: "./fonts".to_string(),
    }
}

pub fn state(pool: PgPool) -> AppState {
    AppState::from_pool(pool, test_config())
}

/// Conta gravada direto no banco; o hash não é usado nestes testes.
pub async fn account(pool: &PgPool, role: Role) -> AuthenticatedUser {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO accounts (email, password_hash, name, role) \
         VALUES ($1, 'x', 'Conta de Teste', $2) RETURNING id",
    )
    .bind(format!("{}@test.local", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();
    AuthenticatedUser { id, role }
}

pub async fn dish(pool: &PgPool, name: &str, price: i64) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO dishes (name, dish_type, price) VALUES ($1, 'Main', $2) RETURNING id",
    )
    .bind(name)
    .bind(Decimal::from(price))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn soft_delete_dish(pool: &PgPool, dish_id: Uuid) {
    sqlx::query("UPDATE dishes SET is_deleted = TRUE, deleted_at = NOW() WHERE id = $1")
        .bind(dish_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn user_coupon(pool: &PgPool, account_id: Uuid, amount: i64, code: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO user_coupons (account_id, discount_amount, code, expires_at) \
         VALUES ($1, $2, $3, NOW() + INTERVAL '1 day') RETURNING id",
    )
    .bind(account_id)
    .bind(Decimal::from(amount))
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}
