// src/models/reservation.rs

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, models::table::TableStatus};

/// Janela em que o cliente ainda pode cancelar, contada a partir da criação.
pub const CUSTOMER_CANCEL_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn allowed_next(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled, Completed],
            Confirmed => &[Cancelled, Completed],
            Cancelled | Completed => &[],
        }
    }

    pub fn ensure_transition(&self, next: ReservationStatus) -> Result<(), AppError> {
        if self.allowed_next().contains(&next) {
            Ok(())
        } else {
            Err(AppError::InvalidReservationTransition {
                from: *self,
                to: next,
            })
        }
    }

    /// Efeito colateral na mesa ao entrar neste status.
    pub fn table_status_after(&self) -> Option<TableStatus> {
        match self {
            ReservationStatus::Confirmed => Some(TableStatus::Occupied),
            ReservationStatus::Cancelled | ReservationStatus::Completed => Some(TableStatus::Available),
            ReservationStatus::Pending => None,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

pub fn customer_can_cancel(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at < Duration::minutes(CUSTOMER_CANCEL_WINDOW_MINUTES)
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub table_id: Uuid,
    pub account_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub reservation_time: DateTime<Utc>,
    #[schema(example = 4)]
    pub number_of_guests: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    pub table_id: Uuid,
    pub reservation_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub number_of_guests: i32,
    #[validate(length(min = 1, max = 100))]
    pub customer_name: Option<String>,
    #[validate(length(min = 8, max = 20))]
    pub customer_phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationStatusPayload {
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationListQuery {
    pub status: Option<ReservationStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reservation_transitions() {
        let p = ReservationStatus::Pending;
        assert!(p.ensure_transition(ReservationStatus::Confirmed).is_ok());
        assert!(p.ensure_transition(ReservationStatus::Cancelled).is_ok());
        assert!(p.ensure_transition(ReservationStatus::Completed).is_ok());
        assert!(p.ensure_transition(ReservationStatus::Pending).is_err());
    }

    #[test]
    fn confirmed_cannot_go_back_to_pending() {
        let c = ReservationStatus::Confirmed;
        assert!(c.ensure_transition(ReservationStatus::Completed).is_ok());
        assert!(matches!(
            c.ensure_transition(ReservationStatus::Pending),
            Err(AppError::InvalidReservationTransition { .. })
        ));
    }

    #[test]
    fn closed_reservations_are_terminal() {
        assert!(ReservationStatus::Cancelled.allowed_next().is_empty());
        assert!(ReservationStatus::Completed.allowed_next().is_empty());
    }

    #[test]
    fn table_follows_reservation() {
        assert_eq!(
            ReservationStatus::Confirmed.table_status_after(),
            Some(TableStatus::Occupied)
        );
        assert_eq!(
            ReservationStatus::Cancelled.table_status_after(),
            Some(TableStatus::Available)
        );
        assert_eq!(
            ReservationStatus::Completed.table_status_after(),
            Some(TableStatus::Available)
        );
        assert_eq!(ReservationStatus::Pending.table_status_after(), None);
    }

    #[test]
    fn cancel_window_is_measured_from_creation() {
        let created = Utc::now();
        assert!(customer_can_cancel(created, created + Duration::minutes(59)));
        assert!(!customer_can_cancel(created, created + Duration::minutes(60)));
        assert!(!customer_can_cancel(created, created + Duration::hours(5)));
    }
}
