// src/services/favorite_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FavoriteRepository, MenuRepository},
    models::favorite::{Favorite, FavoriteCheck, FavoriteCount, FavoriteDish},
};

#[derive(Clone)]
pub struct FavoriteService {
    repo: FavoriteRepository,
    menu_repo: MenuRepository,
}

impl FavoriteService {
    pub fn new(repo: FavoriteRepository, menu_repo: MenuRepository) -> Self {
        Self { repo, menu_repo }
    }

    pub async fn add(&self, account_id: Uuid, dish_id: Uuid) -> Result<Favorite, AppError> {
        self.menu_repo
            .find_active(dish_id)
            .await?
            .ok_or(AppError::DishNotFound)?;

        self.repo
            .add(account_id, dish_id)
            .await?
            .ok_or(AppError::FavoriteAlreadyExists)
    }

    pub async fn remove(&self, account_id: Uuid, dish_id: Uuid) -> Result<(), AppError> {
        if !self.repo.remove(account_id, dish_id).await? {
            return Err(AppError::FavoriteNotFound);
        }
        Ok(())
    }

    pub async fn list(&self, account_id: Uuid) -> Result<Vec<FavoriteDish>, AppError> {
        self.repo.list(account_id).await
    }

    pub async fn check(&self, account_id: Uuid, dish_id: Uuid) -> Result<FavoriteCheck, AppError> {
        let is_favorite = self.repo.exists(account_id, dish_id).await?;
        Ok(FavoriteCheck { is_favorite })
    }

    pub async fn count(&self, account_id: Uuid) -> Result<FavoriteCount, AppError> {
        let count = self.repo.count(account_id).await?;
        Ok(FavoriteCount { count })
    }
}
