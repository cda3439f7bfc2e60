//! Coupon management.

use crate::db::Repository;
use crate::domain::{Coupon, CouponKind};
use crate::error::AppError;
use std::sync::Arc;

pub struct CouponService {
    repo: Arc<Repository>,
}

impl CouponService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Create a coupon. (code, title) must be unique together; a Company
    /// coupon carries a supplier, a Universal one must not.
    pub async fn create_coupon(&self, coupon: Coupon) -> Result<Coupon, AppError> {
        match coupon.kind {
            CouponKind::Company if coupon.supplier_id.is_none() => {
                return Err(AppError::Validation(
                    "company coupon requires a supplier".to_string(),
                ));
            }
            CouponKind::Universal if coupon.supplier_id.is_some() => {
                return Err(AppError::Validation(
                    "universal coupon must not carry a supplier".to_string(),
                ));
            }
            _ => {}
        }

        if coupon.discount_value.is_negative() || coupon.discount_value.is_zero() {
            return Err(AppError::Validation(
                "discount value must be positive".to_string(),
            ));
        }

        if let Some(supplier) = coupon.supplier_id {
            self.repo
                .get_supplier(supplier)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("supplier {}", supplier)))?;
        }

        self.repo.insert_coupon(&coupon).await.map_err(|e| {
            let unique = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if unique {
                AppError::Validation(format!(
                    "coupon ({}, {}) already exists",
                    coupon.code, coupon.title
                ))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(coupon)
    }

    pub async fn get_coupon(&self, code: &str) -> Result<Coupon, AppError> {
        self.repo
            .find_coupon(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("coupon {}", code)))
    }
}
