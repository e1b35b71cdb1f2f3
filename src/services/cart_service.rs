// src/services/cart_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CartRepository, MenuRepository},
    models::{
        cart::{Cart, CartView},
        menu::ensure_valid_quantity,
    },
};

#[derive(Clone)]
pub struct CartService {
    repo: CartRepository,
    menu_repo: MenuRepository,
    pool: PgPool,
}

impl CartService {
    pub fn new(repo: CartRepository, menu_repo: MenuRepository, pool: PgPool) -> Self {
        Self {
            repo,
            menu_repo,
            pool,
        }
    }

    /// Carrinho mais recente da conta, criado sob demanda.
    pub async fn get_or_create(&self, account_id: Uuid) -> Result<Cart, AppError> {
        match self.repo.find_latest(&self.pool, account_id).await? {
            Some(cart) => Ok(cart),
            None => self.repo.create(account_id).await,
        }
    }

    pub async fn get_cart(&self, account_id: Uuid) -> Result<CartView, AppError> {
        let cart = self.get_or_create(account_id).await?;
        self.view(cart.id).await
    }

    pub async fn add_item(
        &self,
        account_id: Uuid,
        dish_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, AppError> {
        ensure_valid_quantity(quantity)?;

        let dish = self
            .menu_repo
            .find_active(dish_id)
            .await?
            .ok_or(AppError::DishNotFound)?;
        dish.ensure_orderable()?;

        let cart = self.get_or_create(account_id).await?;
        self.repo.upsert_item(cart.id, dish.id, quantity).await?;

        self.view(cart.id).await
    }

    pub async fn update_item(
        &self,
        account_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, AppError> {
        ensure_valid_quantity(quantity)?;

        let item = self
            .repo
            .set_item_quantity(item_id, account_id, quantity)
            .await?
            .ok_or(AppError::CartItemNotFound)?;

        self.view(item.cart_id).await
    }

    pub async fn remove_item(&self, account_id: Uuid, item_id: Uuid) -> Result<CartView, AppError> {
        if !self.repo.delete_item(item_id, account_id).await? {
            return Err(AppError::CartItemNotFound);
        }
        self.get_cart(account_id).await
    }

    async fn view(&self, cart_id: Uuid) -> Result<CartView, AppError> {
        let lines = self.repo.list_lines(&self.pool, cart_id).await?;
        Ok(CartView::new(cart_id, lines))
    }
}
