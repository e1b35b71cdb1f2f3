// src/services/reward_service.rs

use chrono::{Duration, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::{AccountRepository, CouponRepository, RewardRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        coupon::{UserCoupon, UserCouponStatus},
        reward::{
            compute_redemption, generate_coupon_code, BalanceView, EarnPointsPayload, EarnResult,
            HistoryQuery, RedeemPointsPayload, RedeemResult, RewardHistory, MAX_CODE_ATTEMPTS,
        },
    },
};

const DEFAULT_EARN_ACTION: &str = "Earn points";
const DEFAULT_REDEEM_ACTION: &str = "Redeem points";
const HISTORY_DEFAULT_LIMIT: i64 = 20;
const HISTORY_MAX_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct RewardService {
    repo: RewardRepository,
    coupon_repo: CouponRepository,
    account_repo: AccountRepository,
    pool: PgPool,
}

impl RewardService {
    pub fn new(
        repo: RewardRepository,
        coupon_repo: CouponRepository,
        account_repo: AccountRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            coupon_repo,
            account_repo,
            pool,
        }
    }

    /// Credita pontos. Saldo e histórico andam juntos na mesma transação.
    pub async fn earn(
        &self,
        actor: &AuthenticatedUser,
        payload: &EarnPointsPayload,
    ) -> Result<EarnResult, AppError> {
        let target = payload.account_id.unwrap_or(actor.id);
        let action = payload.action.as_deref().unwrap_or(DEFAULT_EARN_ACTION);

        let mut tx = self.pool.begin().await?;

        self.account_repo
            .find_active_by_id(&mut *tx, target)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let balance = self.repo.increment(&mut *tx, target, payload.points).await?;
        let history = self
            .repo
            .append_history(&mut *tx, target, payload.points, action)
            .await?;

        tx.commit().await?;

        tracing::info!(
            account_id = %target,
            points = payload.points,
            balance = balance.points,
            actor_id = %actor.id,
            "Pontos creditados"
        );
        Ok(EarnResult { balance, history })
    }

    /// Troca pontos por um cupom pessoal. Débito, histórico e cupom no mesmo commit.
    pub async fn redeem(
        &self,
        user: &AuthenticatedUser,
        payload: &RedeemPointsPayload,
    ) -> Result<RedeemResult, AppError> {
        let mut tx = self.pool.begin().await?;

        // O UPDATE guardado evita saldo negativo mesmo com resgates simultâneos
        let wallet = self
            .repo
            .decrement_if_sufficient(&mut *tx, user.id, payload.points)
            .await?
            .ok_or(AppError::InsufficientPoints)?;

        let action = payload.action.as_deref().unwrap_or(DEFAULT_REDEEM_ACTION);
        self.repo
            .append_history(&mut *tx, user.id, -payload.points, action)
            .await?;

        let terms = compute_redemption(payload.points, payload.expiration_days);
        let code = self.unique_code(&mut tx).await?;
        let expires_at = Utc::now() + Duration::days(terms.expiration_days);
        let description = payload
            .description
            .clone()
            .unwrap_or_else(|| format!("Redeemed {} points", payload.points));

        let user_coupon = self
            .coupon_repo
            .insert_user_coupon(
                &mut *tx,
                user.id,
                terms.discount_amount,
                Some(description.as_str()),
                &code,
                expires_at,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            account_id = %user.id,
            points = payload.points,
            code = %user_coupon.code,
            discount = %user_coupon.discount_amount,
            "Pontos resgatados"
        );

        Ok(RedeemResult {
            user_coupon,
            remaining_points: wallet.points,
        })
    }

    pub async fn history(
        &self,
        user: &AuthenticatedUser,
        query: &HistoryQuery,
    ) -> Result<Paginated<RewardHistory>, AppError> {
        let page = PageRequest::new(query.page, query.limit, HISTORY_DEFAULT_LIMIT, HISTORY_MAX_LIMIT);
        let (entries, total) = self
            .repo
            .list_history(user.id, page.limit, page.offset())
            .await?;
        Ok(Paginated::new(entries, page, total))
    }

    pub async fn balance(&self, user: &AuthenticatedUser) -> Result<BalanceView, AppError> {
        let points = self.repo.balance(user.id).await?;
        Ok(BalanceView { points })
    }

    pub async fn my_coupons(
        &self,
        user: &AuthenticatedUser,
        status: Option<UserCouponStatus>,
    ) -> Result<Vec<UserCoupon>, AppError> {
        self.coupon_repo.list_user_coupons(user.id, status).await
    }

    async fn unique_code(&self, conn: &mut PgConnection) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_coupon_code();
            if !self.coupon_repo.code_exists(&mut *conn, &code).await? {
                return Ok(code);
            }
            tracing::warn!(code = %code, "Colisão de código de cupom, gerando outro");
        }
        Err(AppError::CouponCodeGenerationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        common::test_support::{self, account},
        models::account::Role,
    };

    fn earn(account_id: uuid::Uuid, points: i32) -> EarnPointsPayload {
        EarnPointsPayload {
            account_id: Some(account_id),
            points,
            action: None,
        }
    }

    fn redeem(points: i32) -> RedeemPointsPayload {
        RedeemPointsPayload {
            points,
            action: None,
            description: None,
            expiration_days: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn redeem_debits_exact_points_and_issues_unused_coupon(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let cashier = account(&pool, Role::Cashier).await;
        let customer = account(&pool, Role::Customer).await;

        state.reward_service.earn(&cashier, &earn(customer.id, 200)).await.unwrap();
        let result = state.reward_service.redeem(&customer, &redeem(150)).await.unwrap();

        assert_eq!(result.remaining_points, 50);
        assert_eq!(result.user_coupon.status, UserCouponStatus::Unused);
        assert_eq!(result.user_coupon.account_id, customer.id);
        assert_eq!(result.user_coupon.discount_amount, Decimal::from(18000));
        // 7 dias padrão + 7 de bônus acima do limiar
        let hours_left = (result.user_coupon.expires_at - Utc::now()).num_hours();
        assert!((335..=336).contains(&hours_left), "expira em {hours_left}h");

        let balance = state.reward_service.balance(&customer).await.unwrap();
        assert_eq!(balance.points, 50);

        let deltas: Vec<i32> = sqlx::query_scalar(
            "SELECT points_change FROM reward_history WHERE account_id = $1 ORDER BY created_at",
        )
        .bind(customer.id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(deltas, vec![200, -150]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn redeem_beyond_balance_fails_and_keeps_points(pool: PgPool) {
        let state = test_support::state(pool.clone());
        let cashier = account(&pool, Role::Cashier).await;
        let customer = account(&pool, Role::Customer).await;

        // Sem carteira ainda
        assert!(matches!(
            state.reward_service.redeem(&customer, &redeem(1)).await,
            Err(AppError::InsufficientPoints)
        ));

        state.reward_service.earn(&cashier, &earn(customer.id, 10)).await.unwrap();
        match state.reward_service.redeem(&customer, &redeem(11)).await {
            Err(err @ AppError::InsufficientPoints) => assert_eq!(err.to_string(), "Insufficient points"),
            other => panic!("esperava InsufficientPoints, veio {other:?}"),
        }

        assert_eq!(state.reward_service.balance(&customer).await.unwrap().points, 10);
        let coupons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_coupons WHERE account_id = $1")
            .bind(customer.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(coupons, 0);
    }
}
