//! Per-cargo commission computation.

use crate::domain::{Cargo, CargoPricing, Decimal, PricingMode, SupplierPayment};
use crate::engine::fees::QuoteError;
use chrono::{DateTime, Utc};

/// Accumulate the supplier commission over the cargo items against the same
/// pricing row the fee was computed from.
///
/// # Errors
/// `UnsupportedCargoType` if an item has no price entry (the pricing row
/// changed shape since creation).
pub fn supplier_commission(
    cargo: &Cargo,
    pricing: &CargoPricing,
) -> Result<Decimal, QuoteError> {
    let mut commission = Decimal::zero();

    for item in &cargo.items {
        let field = pricing
            .price_field(item.cargo_type)
            .ok_or(QuoteError::UnsupportedCargoType(item.cargo_type))?;

        commission = commission
            + match field.pricing_mode {
                PricingMode::PerWeight => item.weight * field.commission_rate,
                PricingMode::PerItem => Decimal::from_i64(item.qty) * field.commission_rate,
            };
    }

    Ok(commission)
}

/// Derive the payment record for a cargo from its fees and the supplier
/// commission. Created unassigned and pending.
pub fn build_payment(
    cargo: &Cargo,
    supplier_commission: Decimal,
    now: DateTime<Utc>,
) -> SupplierPayment {
    let customer_commission = cargo.service_fee;
    SupplierPayment {
        supplier_id: cargo.supplier_id,
        cargo_id: cargo.id,
        created_at: now,
        period: None,
        revenue: cargo.total_fee,
        profit: cargo.fee - supplier_commission,
        supplier_commission,
        customer_commission,
        commission: supplier_commission + customer_commission,
        status: crate::domain::PaymentStatus::Pending,
    }
}
