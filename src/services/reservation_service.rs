// src/services/reservation_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::{ReservationRepository, TableRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        account::Role,
        reservation::{
            customer_can_cancel, CreateReservationPayload, Reservation, ReservationListQuery,
            ReservationStatus,
        },
    },
};

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    table_repo: TableRepository,
    pool: PgPool,
}

impl ReservationService {
    pub fn new(repo: ReservationRepository, table_repo: TableRepository, pool: PgPool) -> Self {
        Self {
            repo,
            table_repo,
            pool,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        payload: &CreateReservationPayload,
    ) -> Result<Reservation, AppError> {
        self.table_repo
            .find_by_id(&self.pool, payload.table_id)
            .await?
            .filter(|t| !t.is_deleted)
            .ok_or(AppError::TableNotFound)?;

        if payload.reservation_time <= Utc::now() {
            return Err(AppError::ReservationTimeInPast);
        }

        // Reserva feita pelo gerente fica sem dono (cliente de balcão/telefone)
        let account_id = (user.role == Role::Customer).then_some(user.id);

        let reservation = self
            .repo
            .create(
                payload.table_id,
                account_id,
                payload.customer_name.as_deref(),
                payload.customer_phone.as_deref(),
                payload.reservation_time,
                payload.number_of_guests,
            )
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            table_id = %reservation.table_id,
            "Reserva criada"
        );
        Ok(reservation)
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Reservation, AppError> {
        let reservation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;
        ensure_visible(user, &reservation)?;
        Ok(reservation)
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &ReservationListQuery,
    ) -> Result<Paginated<Reservation>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let owner = (user.role == Role::Customer).then_some(user.id);
        let (items, total) = self
            .repo
            .list(owner, query.status, page.limit, page.offset())
            .await?;
        Ok(Paginated::new(items, page, total))
    }

    /// Muda o status e acompanha o estado da mesa na mesma transação.
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let reservation = self
            .repo
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if user.role == Role::Customer {
            ensure_visible(user, &reservation)?;
            if next != ReservationStatus::Cancelled {
                return Err(AppError::Forbidden(
                    "Customers can only cancel reservations".to_string(),
                ));
            }
            if !customer_can_cancel(reservation.created_at, Utc::now()) {
                return Err(AppError::ReservationCancelWindowExpired);
            }
        }

        reservation.status.ensure_transition(next)?;

        let updated = self.repo.update_status(&mut *tx, id, next).await?;
        if let Some(table_status) = next.table_status_after() {
            self.table_repo
                .set_status(&mut *tx, updated.table_id, table_status)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            reservation_id = %id,
            from = %reservation.status,
            to = %next,
            "Status da reserva alterado"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ReservationNotFound);
        }
        tracing::info!(reservation_id = %id, "Reserva removida");
        Ok(())
    }
}

// Cliente só enxerga as próprias reservas; gerente enxerga todas.
fn ensure_visible(user: &AuthenticatedUser, reservation: &Reservation) -> Result<(), AppError> {
    if user.role == Role::Customer && reservation.account_id != Some(user.id) {
        return Err(AppError::ReservationForbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(owner: Option<Uuid>) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: Uuid::new_v4(),
            table_id: Uuid::new_v4(),
            account_id: owner,
            customer_name: None,
            customer_phone: None,
            reservation_time: now,
            number_of_guests: 2,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn customers_only_see_their_reservations() {
        let me = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };
        assert!(ensure_visible(&me, &reservation(Some(me.id))).is_ok());
        assert!(matches!(
            ensure_visible(&me, &reservation(Some(Uuid::new_v4()))),
            Err(AppError::ReservationForbidden)
        ));
        assert!(matches!(
            ensure_visible(&me, &reservation(None)),
            Err(AppError::ReservationForbidden)
        ));
    }

    #[test]
    fn managers_see_everything() {
        let manager = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Manager,
        };
        assert!(ensure_visible(&manager, &reservation(None)).is_ok());
        assert!(ensure_visible(&manager, &reservation(Some(Uuid::new_v4()))).is_ok());
    }
}
