// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::account::Role,
};

/// 1. O Trait que define quem pode executar uma operação
pub trait RolePolicy: Send + Sync + 'static {
    const ALLOWED: &'static [Role];
    const ACTION: &'static str;
}

/// 2. O Extractor (Guardião). Entrega o usuário já autorizado.
pub struct RequireRole<P>(pub AuthenticatedUser, pub PhantomData<P>);

pub fn check_role<P: RolePolicy>(user: &AuthenticatedUser) -> Result<(), AppError> {
    if P::ALLOWED.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to {}",
            user.role,
            P::ACTION
        )))
    }
}

// 3. Implementação do FromRequestParts
impl<P, S> FromRequestParts<S> for RequireRole<P>
where
    P: RolePolicy,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::InvalidToken)?;

        check_role::<P>(&user)?;

        Ok(RequireRole(user, PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS POLÍTICAS (TIPOS)
// ---

pub struct ProcessPayment;
impl RolePolicy for ProcessPayment {
    const ALLOWED: &'static [Role] = &[Role::Customer, Role::Manager, Role::Admin];
    const ACTION: &'static str = "process payments";
}

pub struct ViewPayments;
impl RolePolicy for ViewPayments {
    const ALLOWED: &'static [Role] = &[Role::Customer, Role::Manager, Role::Admin, Role::Cashier];
    const ACTION: &'static str = "view payments";
}

pub struct UpdateOrderStatus;
impl RolePolicy for UpdateOrderStatus {
    const ALLOWED: &'static [Role] = &[Role::Waiter, Role::KitchenStaff, Role::Manager];
    const ACTION: &'static str = "update order status";
}

pub struct ViewNewOrders;
impl RolePolicy for ViewNewOrders {
    const ALLOWED: &'static [Role] = &[Role::Waiter, Role::KitchenStaff, Role::Manager];
    const ACTION: &'static str = "view new orders";
}

pub struct ManageMenu;
impl RolePolicy for ManageMenu {
    const ALLOWED: &'static [Role] = &[Role::Manager, Role::Admin];
    const ACTION: &'static str = "manage the menu";
}

pub struct ManageCoupons;
impl RolePolicy for ManageCoupons {
    const ALLOWED: &'static [Role] = &[Role::Manager, Role::Admin];
    const ACTION: &'static str = "manage coupons";
}

pub struct ManageTables;
impl RolePolicy for ManageTables {
    const ALLOWED: &'static [Role] = &[Role::Manager, Role::Admin];
    const ACTION: &'static str = "manage tables";
}

pub struct ManageStaff;
impl RolePolicy for ManageStaff {
    const ALLOWED: &'static [Role] = &[Role::Admin, Role::Manager];
    const ACTION: &'static str = "manage staff accounts";
}

pub struct DeleteAccount;
impl RolePolicy for DeleteAccount {
    const ALLOWED: &'static [Role] = &[Role::Admin];
    const ACTION: &'static str = "delete accounts";
}

pub struct EarnPoints;
impl RolePolicy for EarnPoints {
    const ALLOWED: &'static [Role] = &[Role::Admin, Role::Manager, Role::Cashier];
    const ACTION: &'static str = "credit reward points";
}

pub struct ReservationAccess;
impl RolePolicy for ReservationAccess {
    const ALLOWED: &'static [Role] = &[Role::Manager, Role::Customer];
    const ACTION: &'static str = "access reservations";
}

pub struct ManageReservations;
impl RolePolicy for ManageReservations {
    const ALLOWED: &'static [Role] = &[Role::Manager];
    const ACTION: &'static str = "delete reservations";
}

pub struct ReportIncident;
impl RolePolicy for ReportIncident {
    const ALLOWED: &'static [Role] = &[Role::KitchenStaff, Role::Waiter];
    const ACTION: &'static str = "report incidents";
}

pub struct ManageIncidents;
impl RolePolicy for ManageIncidents {
    const ALLOWED: &'static [Role] = &[Role::Manager];
    const ACTION: &'static str = "manage incident reports";
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn payment_is_limited_to_customer_manager_admin() {
        for role in [Role::Customer, Role::Manager, Role::Admin] {
            assert!(check_role::<ProcessPayment>(&user(role)).is_ok());
        }
        for role in [Role::Cashier, Role::Waiter, Role::KitchenStaff] {
            assert!(matches!(
                check_role::<ProcessPayment>(&user(role)),
                Err(AppError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn order_status_is_for_floor_and_kitchen() {
        for role in [Role::Waiter, Role::KitchenStaff, Role::Manager] {
            assert!(check_role::<UpdateOrderStatus>(&user(role)).is_ok());
        }
        for role in [Role::Customer, Role::Cashier, Role::Admin] {
            assert!(check_role::<UpdateOrderStatus>(&user(role)).is_err());
        }
    }

    #[test]
    fn only_admin_deletes_accounts() {
        assert!(check_role::<DeleteAccount>(&user(Role::Admin)).is_ok());
        assert!(check_role::<DeleteAccount>(&user(Role::Manager)).is_err());
    }

    #[test]
    fn incidents_are_reported_by_staff_and_managed_by_manager() {
        assert!(check_role::<ReportIncident>(&user(Role::KitchenStaff)).is_ok());
        assert!(check_role::<ReportIncident>(&user(Role::Manager)).is_err());
        assert!(check_role::<ManageIncidents>(&user(Role::Manager)).is_ok());
        assert!(check_role::<ManageIncidents>(&user(Role::Waiter)).is_err());
    }

    #[test]
    fn forbidden_message_names_role_and_action() {
        let err = check_role::<EarnPoints>(&user(Role::Customer)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Role 'Customer' is not allowed to credit reward points"
        );
    }
}
