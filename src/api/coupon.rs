use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::domain::{Coupon, CouponKind, Decimal, DiscountType, SupplierId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponBody {
    pub code: String,
    pub title: String,
    pub kind: CouponKind,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_weight: Option<Decimal>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub supplier_id: Option<i64>,
}

pub async fn create_coupon(
    State(state): State<AppState>,
    Json(body): Json<CouponBody>,
) -> Result<Json<Coupon>, AppError> {
    let coupon = Coupon {
        code: body.code,
        title: body.title,
        kind: body.kind,
        discount_type: body.discount_type,
        discount_value: body.discount_value,
        min_weight: body.min_weight,
        expires_at: body.expires_at,
        supplier_id: body.supplier_id.map(SupplierId::new),
    };

    let stored = state.coupon_service.create_coupon(coupon).await?;
    Ok(Json(stored))
}

pub async fn get_coupon(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Coupon>, AppError> {
    let coupon = state.coupon_service.get_coupon(&code).await?;
    Ok(Json(coupon))
}
