// src/services/table_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TableRepository,
    models::table::{CreateTablePayload, DiningTable, UpdateTablePayload},
};

#[derive(Clone)]
pub struct TableService {
    repo: TableRepository,
    pool: PgPool,
}

impl TableService {
    pub fn new(repo: TableRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<DiningTable>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<DiningTable, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or(AppError::TableNotFound)
    }

    pub async fn create(&self, payload: &CreateTablePayload) -> Result<DiningTable, AppError> {
        let table = self
            .repo
            .create(payload.seats, payload.floor_number, payload.status)
            .await?;
        tracing::info!(table_id = %table.id, seats = table.seats, "Mesa criada");
        Ok(table)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateTablePayload) -> Result<DiningTable, AppError> {
        self.repo
            .update(id, payload.seats, payload.floor_number, payload.status)
            .await?
            .ok_or(AppError::TableNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::TableNotFound);
        }
        tracing::info!(table_id = %id, "Mesa removida");
        Ok(())
    }
}
