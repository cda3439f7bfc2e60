//! Coupon storage and lookup.

use super::{fmt_datetime, parse_datetime, parse_decimal, Repository};
use crate::domain::{Coupon, CouponKind, DiscountType, SupplierId};
use sqlx::Row;
use tracing::warn;

impl Repository {
    /// Insert a coupon. A duplicate (code, title) pair surfaces as a
    /// unique-violation database error for the caller to translate.
    pub async fn insert_coupon(&self, coupon: &Coupon) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO coupons
            (code, title, kind, discount_type, discount_value, min_weight, expires_at, supplier_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&coupon.code)
        .bind(&coupon.title)
        .bind(coupon.kind.as_str())
        .bind(coupon.discount_type.as_str())
        .bind(coupon.discount_value.to_canonical_string())
        .bind(coupon.min_weight.map(|w| w.to_canonical_string()))
        .bind(coupon.expires_at.map(fmt_datetime))
        .bind(coupon.supplier_id.map(|s| s.as_i64()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Latest coupon carrying the given code.
    pub async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM coupons WHERE code = ? ORDER BY id DESC LIMIT 1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| {
            let kind: String = r.get("kind");
            let discount_type: String = r.get("discount_type");
            let discount_value: String = r.get("discount_value");

            Coupon {
                code: r.get("code"),
                title: r.get("title"),
                kind: CouponKind::parse(&kind).unwrap_or_else(|| {
                    warn!(value = %kind, "Unknown coupon kind in store, defaulting to universal");
                    CouponKind::Universal
                }),
                discount_type: DiscountType::parse(&discount_type).unwrap_or_else(|| {
                    warn!(value = %discount_type, "Unknown discount type in store, defaulting to fixed");
                    DiscountType::Fixed
                }),
                discount_value: parse_decimal("discount_value", &discount_value),
                min_weight: r
                    .get::<Option<String>, _>("min_weight")
                    .map(|s| parse_decimal("min_weight", &s)),
                expires_at: r
                    .get::<Option<String>, _>("expires_at")
                    .map(|s| parse_datetime("expires_at", &s)),
                supplier_id: r.get::<Option<i64>, _>("supplier_id").map(SupplierId::new),
            }
        }))
    }
}
