// src/services/payment_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::{CouponRepository, OrderRepository, PaymentRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        account::Role,
        order::OrderStatus,
        payment::{
            capped_discount, final_amount, generate_transaction_ref, DiscountSource, Payment,
            PaymentDetail, PaymentListQuery, PaymentOutcome, ProcessPaymentPayload,
        },
    },
};

#[derive(Clone)]
pub struct PaymentService {
    order_repo: OrderRepository,
    payment_repo: PaymentRepository,
    coupon_repo: CouponRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(
        order_repo: OrderRepository,
        payment_repo: PaymentRepository,
        coupon_repo: CouponRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            payment_repo,
            coupon_repo,
            pool,
        }
    }

    /// Fecha o pedido com um pagamento concluído.
    /// Idempotente: se já existe pagamento concluído, ele é devolvido sem efeitos colaterais.
    pub async fn process_payment(
        &self,
        user: &AuthenticatedUser,
        payload: &ProcessPaymentPayload,
    ) -> Result<PaymentOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // A trava na linha do pedido serializa pagamentos concorrentes do mesmo pedido
        let order = self
            .order_repo
            .lock_by_id(&mut *tx, payload.order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if user.role == Role::Customer {
            order.ensure_access(Some(user))?;
        }

        if let Some(existing) = self
            .payment_repo
            .find_completed_for_order(&mut *tx, order.id)
            .await?
        {
            tx.commit().await?;
            tracing::info!(order_id = %order.id, payment_id = %existing.id, "Pedido já estava pago");
            return Ok(PaymentOutcome {
                applied_discount: existing.discount,
                final_amount: existing.amount,
                payment: existing,
                order,
                already_paid: true,
            });
        }

        if order.status != OrderStatus::Completed {
            order.status.ensure_transition(OrderStatus::Completed)?;
        }

        let base_amount = order.final_price;
        let source = self.resolve_discount(&mut tx, user, payload).await?;

        let discount = capped_discount(source.face_value(), base_amount);
        let amount = final_amount(base_amount, discount);

        let (coupon_id, user_coupon_id) = match source {
            DiscountSource::None => (None, None),
            DiscountSource::Coupon { coupon_id, .. } => (Some(coupon_id), None),
            DiscountSource::UserCoupon { user_coupon_id, .. } => (None, Some(user_coupon_id)),
        };

        let payment = self
            .payment_repo
            .insert_completed(
                &mut *tx,
                order.id,
                payload.method,
                &generate_transaction_ref(),
                amount,
                discount,
                user_coupon_id,
            )
            .await?;

        let order = self
            .order_repo
            .settle(&mut *tx, order.id, amount, coupon_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            payment_id = %payment.id,
            amount = %amount,
            discount = %discount,
            "Pagamento concluído"
        );

        Ok(PaymentOutcome {
            payment,
            order,
            applied_discount: discount,
            final_amount: amount,
            already_paid: false,
        })
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &PaymentListQuery,
    ) -> Result<Paginated<Payment>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let owner = (user.role == Role::Customer).then_some(user.id);

        let (payments, total) = self
            .payment_repo
            .list_completed(
                owner,
                query.order_id,
                query.start_date,
                query.end_date,
                page.limit,
                page.offset(),
            )
            .await?;

        Ok(Paginated::new(payments, page, total))
    }

    pub async fn detail(&self, user: &AuthenticatedUser, payment_id: Uuid) -> Result<PaymentDetail, AppError> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        let order = match payment.order_id {
            Some(order_id) => self.order_repo.find_by_id(order_id).await?,
            None => None,
        };

        if user.role == Role::Customer {
            let owns = order
                .as_ref()
                .is_some_and(|o| o.account_id == Some(user.id));
            if !owns {
                return Err(AppError::Forbidden(
                    "You do not have access to this payment".to_string(),
                ));
            }
        }

        let items = match &order {
            Some(o) => self.order_repo.list_items(&self.pool, o.id).await?,
            None => Vec::new(),
        };
        let total: Decimal = items.iter().map(|i| i.line_total).sum();

        Ok(PaymentDetail {
            payment,
            order,
            items,
            total,
        })
    }

    // Cupom pessoal tem prioridade sobre o compartilhado.
    async fn resolve_discount(
        &self,
        conn: &mut PgConnection,
        user: &AuthenticatedUser,
        payload: &ProcessPaymentPayload,
    ) -> Result<DiscountSource, AppError> {
        let now = Utc::now();

        let code = payload
            .user_coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if let Some(code) = code {
            let user_coupon = self
                .coupon_repo
                .find_user_coupon_by_code(&mut *conn, code)
                .await?
                .ok_or(AppError::UserCouponNotFound)?;
            user_coupon.ensure_redeemable_by(user.id, now)?;

            // Consumo condicional: perdeu a corrida para outro pagamento
            if !self
                .coupon_repo
                .mark_user_coupon_used(&mut *conn, user_coupon.id)
                .await?
            {
                return Err(AppError::UserCouponUnavailable);
            }

            return Ok(DiscountSource::UserCoupon {
                user_coupon_id: user_coupon.id,
                amount: user_coupon.discount_amount,
            });
        }

        if let Some(coupon_id) = payload.coupon_id {
            let coupon = self
                .coupon_repo
                .find_coupon(&mut *conn, coupon_id)
                .await?
                .ok_or(AppError::CouponNotFound)?;
            coupon.ensure_usable(now)?;
            self.coupon_repo.increment_times_used(&mut *conn, coupon.id).await?;

            return Ok(DiscountSource::Coupon {
                coupon_id: coupon.id,
                amount: coupon.discount_amount,
            });
        }

        Ok(DiscountSource::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::test_support::{self, account, dish, user_coupon},
        models::{
            coupon::UserCouponStatus,
            order::{CreateOrderPayload, OrderLinePayload},
            payment::PaymentMethod,
        },
    };

    // Pedido de 25,00 (10 x 2 + 5 x 1) em nome da conta.
    async fn order_of_25(state: &crate::config::AppState, pool: &PgPool, owner: &AuthenticatedUser) -> Uuid {
        let a = dish(pool, &format!("Pho {}", Uuid::new_v4()), 10).await;
        let b = dish(pool, &format!("Cha Gio {}", Uuid::new_v4()), 5).await;
        let payload = CreateOrderPayload {
            items: vec![
                OrderLinePayload { dish_id: a, quantity: 2 },
                OrderLinePayload { dish_id: b, quantity: 1 },
            ],
            table_id: None,
            customer_phone: None,
            order_type: None,
            description: None,
        };
        state
            .order_service
            .create_order(Some(owner), &payload)
            .await
            .unwrap()
            .order
            .id
    }

    fn pay(order_id: Uuid, code: Option<&str>) -> ProcessPaymentPayload {
        ProcessPaymentPayload {
            order_id,
            method: PaymentMethod::Cash,
            coupon_id: None,
            user_coupon_code: code.map(str::to_string),
        }
    }

    async fn coupon_status(pool: &PgPool, id: Uuid) -> UserCouponStatus {
        sqlx::query_scalar("SELECT status FROM user_coupons WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cash_payment_completes_order_at_full_price(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let order_id = order_of_25(&state, &pool, &customer).await;

        let outcome = state.payment_service.process_payment(&customer, &pay(order_id, None)).await.unwrap();

        assert!(!outcome.already_paid);
        assert_eq!(outcome.applied_discount, Decimal::ZERO);
        assert_eq!(outcome.final_amount, Decimal::from(25));
        assert_eq!(outcome.order.status, OrderStatus::Completed);
        assert_eq!(outcome.order.final_price, Decimal::from(25));

        let detail = state.payment_service.detail(&customer, outcome.payment.id).await.unwrap();
        assert_eq!(detail.total, outcome.order.total);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn second_payment_returns_the_first_without_discounting_again(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let order_id = order_of_25(&state, &pool, &customer).await;
        let coupon_id = user_coupon(&pool, customer.id, 5, "UC-000001-AAAAAA").await;

        let first = state
            .payment_service
            .process_payment(&customer, &pay(order_id, Some("UC-000001-AAAAAA")))
            .await
            .unwrap();
        assert_eq!(first.applied_discount, Decimal::from(5));
        assert_eq!(first.final_amount, Decimal::from(20));
        assert_eq!(coupon_status(&pool, coupon_id).await, UserCouponStatus::Used);

        let second = state
            .payment_service
            .process_payment(&customer, &pay(order_id, Some("UC-000001-AAAAAA")))
            .await
            .unwrap();
        assert!(second.already_paid);
        assert_eq!(second.payment.id, first.payment.id);
        assert_eq!(second.final_amount, Decimal::from(20));
        assert_eq!(second.order.final_price, Decimal::from(20));

        let payments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE order_id = $1")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(payments, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn user_coupon_is_consumed_only_once(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let first_order = order_of_25(&state, &pool, &customer).await;
        let second_order = order_of_25(&state, &pool, &customer).await;
        user_coupon(&pool, customer.id, 5, "UC-000002-BBBBBB").await;

        state
            .payment_service
            .process_payment(&customer, &pay(first_order, Some("UC-000002-BBBBBB")))
            .await
            .unwrap();

        let reuse = state
            .payment_service
            .process_payment(&customer, &pay(second_order, Some("UC-000002-BBBBBB")))
            .await;
        match reuse {
            Err(err @ AppError::UserCouponUnavailable) => {
                assert_eq!(err.to_string(), "UserCoupon is not available")
            }
            other => panic!("esperava UserCouponUnavailable, veio {other:?}"),
        }

        // A falha não deixa pagamento nem fecha o segundo pedido
        let order = state.order_service.order_menu(Some(&customer), second_order).await.unwrap().order;
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn someone_elses_user_coupon_is_rejected(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let customer = account(&pool, Role::Customer).await;
        let other = account(&pool, Role::Customer).await;
        let order_id = order_of_25(&state, &pool, &customer).await;
        let coupon_id = user_coupon(&pool, other.id, 5, "UC-000003-CCCCCC").await;

        let result = state
            .payment_service
            .process_payment(&customer, &pay(order_id, Some("UC-000003-CCCCCC")))
            .await;
        assert!(matches!(result, Err(AppError::UserCouponNotOwned)));
        assert_eq!(coupon_status(&pool, coupon_id).await, UserCouponStatus::Unused);
    }
}
