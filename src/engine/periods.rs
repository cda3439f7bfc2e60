//! Grouped-reduce of supplier payments into settlement-period summaries.

use crate::domain::{Decimal, PaymentStatus, SettlementPeriod, SupplierPayment};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate totals for one settlement period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub period: SettlementPeriod,
    pub payment_count: usize,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub supplier_commission: Decimal,
    pub customer_commission: Decimal,
    pub commission: Decimal,
    /// Paid only when every constituent payment is paid.
    pub status: PaymentStatus,
}

/// Group assigned payments by period and fold each group's totals.
/// Unassigned payments (no period yet) are skipped; output is ordered by
/// period ascending.
pub fn summarize_periods(payments: &[SupplierPayment]) -> Vec<PeriodSummary> {
    let mut groups: BTreeMap<SettlementPeriod, PeriodSummary> = BTreeMap::new();

    for payment in payments {
        let Some(period) = payment.period else {
            continue;
        };

        let entry = groups.entry(period).or_insert_with(|| PeriodSummary {
            period,
            payment_count: 0,
            revenue: Decimal::zero(),
            profit: Decimal::zero(),
            supplier_commission: Decimal::zero(),
            customer_commission: Decimal::zero(),
            commission: Decimal::zero(),
            status: PaymentStatus::Paid,
        });

        entry.payment_count += 1;
        entry.revenue = entry.revenue + payment.revenue;
        entry.profit = entry.profit + payment.profit;
        entry.supplier_commission = entry.supplier_commission + payment.supplier_commission;
        entry.customer_commission = entry.customer_commission + payment.customer_commission;
        entry.commission = entry.commission + payment.commission;
        if payment.status != PaymentStatus::Paid {
            entry.status = PaymentStatus::Pending;
        }
    }

    groups.into_values().collect()
}
