// src/models/table.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "table_status")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: Uuid,
    #[schema(example = 4)]
    pub seats: i32,
    #[schema(example = 1)]
    pub floor_number: i32,
    pub status: TableStatus,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiningTable {
    /// Pedido no salão só em mesa livre ou já ocupada pelo próprio grupo.
    pub fn ensure_accepts_orders(&self) -> Result<(), AppError> {
        if self.is_deleted {
            return Err(AppError::TableNotFound);
        }
        match self.status {
            TableStatus::Available | TableStatus::Occupied => Ok(()),
            TableStatus::Reserved | TableStatus::Unavailable => Err(AppError::TableUnavailable),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTablePayload {
    #[validate(range(min = 1, message = "A table needs at least one seat"))]
    pub seats: i32,
    #[validate(range(min = 0))]
    pub floor_number: i32,
    pub status: Option<TableStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTablePayload {
    #[validate(range(min = 1, message = "A table needs at least one seat"))]
    pub seats: Option<i32>,
    #[validate(range(min = 0))]
    pub floor_number: Option<i32>,
    pub status: Option<TableStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(status: TableStatus) -> DiningTable {
        let now = Utc::now();
        DiningTable {
            id: Uuid::new_v4(),
            seats: 4,
            floor_number: 1,
            status,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn orders_go_to_available_or_occupied_tables() {
        assert!(table(TableStatus::Available).ensure_accepts_orders().is_ok());
        assert!(table(TableStatus::Occupied).ensure_accepts_orders().is_ok());
        assert!(matches!(
            table(TableStatus::Reserved).ensure_accepts_orders(),
            Err(AppError::TableUnavailable)
        ));
    }

    #[test]
    fn deleted_table_is_missing() {
        let mut t = table(TableStatus::Available);
        t.is_deleted = true;
        assert!(matches!(t.ensure_accepts_orders(), Err(AppError::TableNotFound)));
    }
}
