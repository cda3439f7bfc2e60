//! Discount coupons: universal or company-scoped, fixed or percentage.

use crate::domain::{Decimal, SupplierId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// Valid for any supplier.
    Universal,
    /// Valid only for the issuing supplier.
    Company,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::Universal => "universal",
            CouponKind::Company => "company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "universal" => Some(CouponKind::Universal),
            "company" => Some(CouponKind::Company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Fixed,
    Percentage,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Fixed => "fixed",
            DiscountType::Percentage => "percentage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(DiscountType::Fixed),
            "percentage" => Some(DiscountType::Percentage),
            _ => None,
        }
    }
}

/// Reason a coupon cannot be applied to a cargo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon expired")]
    Expired,
    #[error("coupon is not valid for this supplier")]
    WrongSupplier,
    #[error("cargo weight below coupon minimum")]
    UnderMinWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub title: String,
    pub kind: CouponKind,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_weight: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Required iff kind is Company.
    pub supplier_id: Option<SupplierId>,
}

impl Coupon {
    /// Check this coupon against a concrete cargo: supplier scope, expiry,
    /// and minimum weight.
    pub fn check(
        &self,
        supplier: SupplierId,
        total_weight: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), CouponRejection> {
        if let Some(expires_at) = self.expires_at {
            if now > expires_at {
                return Err(CouponRejection::Expired);
            }
        }

        if self.kind == CouponKind::Company && self.supplier_id != Some(supplier) {
            return Err(CouponRejection::WrongSupplier);
        }

        if let Some(min_weight) = self.min_weight {
            if total_weight < min_weight {
                return Err(CouponRejection::UnderMinWeight);
            }
        }

        Ok(())
    }

    /// Apply this coupon's discount to a goods fee, clamped at zero.
    pub fn apply(&self, fee: Decimal) -> Decimal {
        let discounted = match self.discount_type {
            DiscountType::Fixed => fee - self.discount_value,
            DiscountType::Percentage => {
                fee - fee * self.discount_value / Decimal::hundred()
            }
        };
        discounted.max_zero()
    }
}
