// src/services/coupon_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CouponRepository,
    models::{
        coupon::{CouponView, CreateCouponPayload, UpdateCouponPayload},
        menu::ensure_non_negative,
    },
};

#[derive(Clone)]
pub struct CouponService {
    repo: CouponRepository,
}

impl CouponService {
    pub fn new(repo: CouponRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, q: Option<&str>) -> Result<Vec<CouponView>, AppError> {
        let q = q.map(str::trim).filter(|s| !s.is_empty());
        let now = Utc::now();
        let coupons = self.repo.list_coupons(q).await?;
        Ok(coupons.into_iter().map(|c| CouponView::new(c, now)).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<CouponView, AppError> {
        let coupon = self
            .repo
            .find_active_coupon(id)
            .await?
            .ok_or(AppError::CouponNotFound)?;
        Ok(CouponView::new(coupon, Utc::now()))
    }

    pub async fn create(&self, payload: &CreateCouponPayload) -> Result<CouponView, AppError> {
        ensure_non_negative(payload.discount_amount, "discountAmount")?;

        let coupon = self
            .repo
            .create_coupon(
                payload.discount_amount,
                payload.expiration_date,
                payload.description.as_deref(),
            )
            .await?;

        tracing::info!(coupon_id = %coupon.id, "Cupom criado");
        Ok(CouponView::new(coupon, Utc::now()))
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateCouponPayload) -> Result<CouponView, AppError> {
        if let Some(amount) = payload.discount_amount {
            ensure_non_negative(amount, "discountAmount")?;
        }

        let coupon = self
            .repo
            .update_coupon(
                id,
                payload.discount_amount,
                payload.expiration_date,
                payload.description.as_deref(),
            )
            .await?
            .ok_or(AppError::CouponNotFound)?;
        Ok(CouponView::new(coupon, Utc::now()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_coupon(id).await? {
            return Err(AppError::CouponNotFound);
        }
        Ok(())
    }
}
