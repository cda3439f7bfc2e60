//! Fee quote computation for cargo creation.
//!
//! Single pass over the cargo items against a resolved pricing row:
//! per-mode fee accumulation, weight-tiered service fee, optional coupon
//! discount with a zero floor on the goods fee.

use crate::domain::{CargoItem, CargoPricing, CargoTypeId, Coupon, Decimal, PricingMode};
use thiserror::Error;

/// Flat surcharge per item-priced product unit.
const PER_ITEM_SURCHARGE: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("no price entry for cargo type {0}")]
    UnsupportedCargoType(CargoTypeId),
    #[error("total weight {total} below supplier minimum {minimum}")]
    MinWeight { total: Decimal, minimum: Decimal },
    #[error("cargo has no items")]
    EmptyItems,
}

/// Result of a fee computation, persisted onto the cargo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeQuote {
    pub total_weight: Decimal,
    pub total_qty: i64,
    /// Units priced per item; each adds the flat surcharge to the service fee.
    pub per_item_count: i64,
    /// Goods fee before any coupon.
    pub base_fee: Decimal,
    /// Goods fee after coupon discount (never below zero).
    pub fee: Decimal,
    pub service_fee: Decimal,
    /// fee + service_fee.
    pub total_fee: Decimal,
}

/// Weight-tiered per-kg service-fee rate.
///
/// 0.25 below 10 kg, 0.20 in [10, 20), 0.10 in [20, 100), 0 at >= 100 kg.
pub fn service_fee_rate(total_weight: Decimal) -> Decimal {
    if total_weight < Decimal::from_i64(10) {
        Decimal::scaled(25, 2)
    } else if total_weight < Decimal::from_i64(20) {
        Decimal::scaled(20, 2)
    } else if total_weight < Decimal::from_i64(100) {
        Decimal::scaled(10, 2)
    } else {
        Decimal::zero()
    }
}

/// Compute the full fee quote for a cargo.
///
/// The coupon, when present, must already have passed scope/expiry/min-weight
/// validation; only its discount arithmetic is applied here.
///
/// # Errors
/// `UnsupportedCargoType` when an item has no price entry in the row,
/// `MinWeight` when the accumulated weight is under the supplier minimum.
pub fn compute_quote(
    items: &[CargoItem],
    pricing: &CargoPricing,
    supplier_min_weight: Decimal,
    coupon: Option<&Coupon>,
) -> Result<FeeQuote, QuoteError> {
    if items.is_empty() {
        return Err(QuoteError::EmptyItems);
    }

    let mut total_weight = Decimal::zero();
    let mut total_qty = 0i64;
    let mut per_item_count = 0i64;
    let mut base_fee = Decimal::zero();

    for item in items {
        let field = pricing
            .price_field(item.cargo_type)
            .ok_or(QuoteError::UnsupportedCargoType(item.cargo_type))?;

        total_weight = total_weight + item.weight;
        total_qty += item.qty;

        match field.pricing_mode {
            PricingMode::PerWeight => {
                base_fee = base_fee + item.weight * field.price;
            }
            PricingMode::PerItem => {
                base_fee = base_fee + Decimal::from_i64(item.qty) * field.price;
                per_item_count += item.qty;
            }
        }
    }

    if total_weight < supplier_min_weight {
        return Err(QuoteError::MinWeight {
            total: total_weight,
            minimum: supplier_min_weight,
        });
    }

    let service_fee = service_fee_rate(total_weight) * total_weight
        + Decimal::from_i64(per_item_count * PER_ITEM_SURCHARGE);

    let fee = match coupon {
        Some(coupon) => coupon.apply(base_fee),
        None => base_fee,
    };

    let total_fee = fee + service_fee;

    Ok(FeeQuote {
        total_weight,
        total_qty,
        per_item_count,
        base_fee,
        fee,
        service_fee,
        total_fee,
    })
}
