// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, time::Duration};

use crate::{
    db::{
        AccountRepository, CartRepository, ChatRepository, CouponRepository, FavoriteRepository,
        IncidentRepository, MenuRepository, OrderRepository, PaymentRepository,
        ReservationRepository, RewardRepository, TableRepository,
    },
    services::{
        account_service::AccountService, cart_service::CartService, chat_service::ChatService,
        coupon_service::CouponService, document_service::DocumentService,
        favorite_service::FavoriteService, incident_service::IncidentService,
        menu_service::MenuService, order_service::OrderService, payment_service::PaymentService,
        reservation_service::ReservationService, reward_service::RewardService,
        table_service::TableService,
    },
};

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub jwt_expires_days: i64,
    pub font_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            port: parse_or("PORT", 3000)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            jwt_expires_days: parse_or("JWT_EXPIRES_DAYS", 7)?,
            font_dir: env::var("FONT_DIR").unwrap_or_else(|_| "./fonts".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub account_service: AccountService,
    pub menu_service: MenuService,
    pub coupon_service: CouponService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub payment_service: PaymentService,
    pub reward_service: RewardService,
    pub table_service: TableService,
    pub reservation_service: ReservationService,
    pub favorite_service: FavoriteService,
    pub incident_service: IncidentService,
    pub chat_service: ChatService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let account_repo = AccountRepository::new(db_pool.clone());
        let menu_repo = MenuRepository::new(db_pool.clone());
        let cart_repo = CartRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let coupon_repo = CouponRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let reward_repo = RewardRepository::new(db_pool.clone());
        let table_repo = TableRepository::new(db_pool.clone());
        let reservation_repo = ReservationRepository::new(db_pool.clone());

        let account_service = AccountService::new(
            account_repo.clone(),
            db_pool.clone(),
            config.jwt_secret.clone(),
            config.jwt_expires_days,
        );
        let menu_service = MenuService::new(menu_repo.clone());
        let coupon_service = CouponService::new(coupon_repo.clone());
        let cart_service = CartService::new(cart_repo.clone(), menu_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            menu_repo.clone(),
            cart_repo,
            table_repo.clone(),
            db_pool.clone(),
        );
        let payment_service = PaymentService::new(
            order_repo,
            payment_repo,
            coupon_repo.clone(),
            db_pool.clone(),
        );
        let reward_service = RewardService::new(
            reward_repo,
            coupon_repo,
            account_repo.clone(),
            db_pool.clone(),
        );
        let table_service = TableService::new(table_repo.clone(), db_pool.clone());
        let reservation_service =
            ReservationService::new(reservation_repo, table_repo, db_pool.clone());
        let favorite_service =
            FavoriteService::new(FavoriteRepository::new(db_pool.clone()), menu_repo);
        let incident_service = IncidentService::new(IncidentRepository::new(db_pool.clone()));
        let chat_service = ChatService::new(
            ChatRepository::new(db_pool.clone()),
            account_repo,
            db_pool.clone(),
        );
        let document_service = DocumentService::new(config.font_dir.clone());

        Self {
            db_pool,
            config,
            account_service,
            menu_service,
            coupon_service,
            cart_service,
            order_service,
            payment_service,
            reward_service,
            table_service,
            reservation_service,
            favorite_service,
            incident_service,
            chat_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_numbers_are_reported_with_the_key() {
        // Variável exclusiva deste teste para não interferir nos demais.
        unsafe { env::set_var("RB_TEST_BAD_PORT", "abc") };
        let err = parse_or::<u16>("RB_TEST_BAD_PORT", 3000).unwrap_err();
        assert!(err.to_string().contains("RB_TEST_BAD_PORT"));
    }

    #[test]
    fn missing_numbers_fall_back_to_default() {
        assert_eq!(parse_or::<u32>("RB_TEST_UNSET_NUMBER", 5).unwrap(), 5);
    }
}
