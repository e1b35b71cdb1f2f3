// src/services/menu_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::MenuRepository,
    models::menu::{ensure_non_negative, CreateDishPayload, Dish, DishListQuery, UpdateDishPayload},
};

pub const DEFAULT_FEATURED_LIMIT: i64 = 5;
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SHORT_LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct MenuService {
    repo: MenuRepository,
}

impl MenuService {
    pub fn new(repo: MenuRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &DishListQuery) -> Result<Paginated<Dish>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let (dishes, total) = self.repo.list(query, page.limit, page.offset()).await?;
        Ok(Paginated::new(dishes, page, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Dish, AppError> {
        self.repo.find_active(id).await?.ok_or(AppError::DishNotFound)
    }

    pub async fn types(&self) -> Result<Vec<String>, AppError> {
        self.repo.list_types().await
    }

    pub async fn featured(&self, limit: Option<i64>) -> Result<Vec<Dish>, AppError> {
        let limit = short_limit(limit, DEFAULT_FEATURED_LIMIT);
        self.repo.featured(limit).await
    }

    pub async fn search(&self, keyword: &str, limit: Option<i64>) -> Result<Vec<Dish>, AppError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::BadRequest("Search keyword is required".to_string()));
        }
        self.repo.search(keyword, short_limit(limit, DEFAULT_SEARCH_LIMIT)).await
    }

    pub async fn create(&self, payload: &CreateDishPayload) -> Result<Dish, AppError> {
        ensure_non_negative(payload.price, "price")?;

        let dish = self
            .repo
            .create(
                payload.name.trim(),
                payload.dish_type.trim(),
                payload.price,
                payload.description.as_deref(),
                payload.image.as_deref(),
                payload.status,
                payload.ingredient_status,
            )
            .await?;

        tracing::info!(dish_id = %dish.id, name = %dish.name, "Prato criado");
        Ok(dish)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateDishPayload) -> Result<Dish, AppError> {
        if let Some(price) = payload.price {
            ensure_non_negative(price, "price")?;
        }

        self.repo
            .update(
                id,
                payload.name.as_deref().map(str::trim),
                payload.dish_type.as_deref().map(str::trim),
                payload.price,
                payload.description.as_deref(),
                payload.image.as_deref(),
                payload.status,
                payload.ingredient_status,
            )
            .await?
            .ok_or(AppError::DishNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::DishNotFound);
        }
        tracing::info!(dish_id = %id, "Prato removido do cardápio");
        Ok(())
    }
}

fn short_limit(limit: Option<i64>, default: i64) -> i64 {
    limit
        .filter(|l| *l >= 1)
        .unwrap_or(default)
        .min(MAX_SHORT_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_use_defaults_and_cap() {
        assert_eq!(short_limit(None, DEFAULT_FEATURED_LIMIT), 5);
        assert_eq!(short_limit(Some(0), DEFAULT_SEARCH_LIMIT), 10);
        assert_eq!(short_limit(Some(500), DEFAULT_SEARCH_LIMIT), 50);
        assert_eq!(short_limit(Some(3), DEFAULT_SEARCH_LIMIT), 3);
    }
}
