//! Commission application and settlement-period reconciliation.

use crate::db::Repository;
use crate::domain::{
    CargoId, Decimal, PaymentStatus, PeriodError, SettlementPeriod, SupplierId,
};
use crate::engine::{self, PeriodSummary};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Aggregate supplier figures for a time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStats {
    pub total_cargos: i64,
    pub new_cargos: i64,
    pub in_progress_cargos: i64,
    pub delivered_cargos: i64,
    pub profit: Decimal,
    pub commission_payments: Decimal,
}

pub struct CommissionService {
    repo: Arc<Repository>,
}

impl CommissionService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Compute and persist the commission payment for a cargo.
    ///
    /// Re-derives the pricing row the fee was computed from, accumulates the
    /// supplier commission per item, and inserts one payment record. A cargo
    /// that already has a payment is left untouched; returns whether a new
    /// record was created.
    pub async fn apply_commissions(&self, cargo_id: CargoId) -> Result<bool, AppError> {
        let cargo = self
            .repo
            .get_cargo(cargo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cargo {}", cargo_id)))?;

        let pricing = self
            .repo
            .find_pricing_for_route(
                cargo.supplier_id,
                cargo.cargo_method,
                cargo.source_location,
                cargo.destination_location,
            )
            .await?
            .ok_or_else(|| {
                AppError::PricingNotFound(format!(
                    "no pricing row for cargo {} route",
                    cargo.id
                ))
            })?;

        let supplier_commission = engine::supplier_commission(&cargo, &pricing)
            .map_err(|e| AppError::UnsupportedCargoType(e.to_string()))?;
        let payment = engine::build_payment(&cargo, supplier_commission, Utc::now());

        let inserted = self.repo.insert_payment(&payment).await?;
        if inserted {
            info!(
                cargo_id = cargo.id.as_i64(),
                supplier_id = cargo.supplier_id.as_i64(),
                commission = %payment.commission,
                "Commission applied"
            );
        }
        Ok(inserted)
    }

    /// Assign a settlement period to a supplier's pending unassigned
    /// payments. The date must fall on the 1st or 15th; time-of-day is
    /// truncated. Idempotent across re-runs.
    pub async fn assign_payment_period(
        &self,
        supplier: SupplierId,
        at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let period = SettlementPeriod::from_datetime(at).map_err(period_error)?;

        self.repo
            .get_supplier(supplier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("supplier {}", supplier)))?;

        let assigned = self.repo.assign_period(supplier, period).await?;
        info!(
            supplier_id = supplier.as_i64(),
            period = %period,
            assigned = assigned,
            "Settlement period assigned"
        );
        Ok(assigned)
    }

    /// Bulk-set the payment status for every payment in a period, regardless
    /// of supplier. Same date validation as assignment.
    pub async fn set_period_payment_status(
        &self,
        at: DateTime<Utc>,
        status: PaymentStatus,
    ) -> Result<u64, AppError> {
        let period = SettlementPeriod::from_datetime(at).map_err(period_error)?;
        let updated = self.repo.set_period_status(period, status).await?;
        info!(period = %period, status = status.as_str(), updated = updated, "Period payment status set");
        Ok(updated)
    }

    /// Aggregate cargo counts and payment sums for a supplier window.
    pub async fn supplier_stats(
        &self,
        supplier: SupplierId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SupplierStats, AppError> {
        self.repo
            .get_supplier(supplier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("supplier {}", supplier)))?;

        let counts = self.repo.cargo_status_counts(supplier, from, to).await?;

        let mut total_cargos = 0i64;
        let mut new_cargos = 0i64;
        let mut in_progress_cargos = 0i64;
        let mut delivered_cargos = 0i64;
        for (status, n) in &counts {
            total_cargos += n;
            if *status == crate::domain::CargoStatus::NewRequest {
                new_cargos += n;
            }
            if *status == crate::domain::CargoStatus::Delivered {
                delivered_cargos += n;
            }
            if status.is_in_progress() {
                in_progress_cargos += n;
            }
        }

        let payments = self.repo.query_payments(supplier, from, to).await?;
        let mut profit = Decimal::zero();
        let mut commission_payments = Decimal::zero();
        for payment in &payments {
            profit = profit + payment.profit;
            commission_payments = commission_payments + payment.commission;
        }

        Ok(SupplierStats {
            total_cargos,
            new_cargos,
            in_progress_cargos,
            delivered_cargos,
            profit,
            commission_payments,
        })
    }

    /// Group a supplier's assigned payments in the window into per-period
    /// summaries.
    pub async fn list_payment_periods(
        &self,
        supplier: SupplierId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PeriodSummary>, AppError> {
        let payments = self.repo.query_payments(supplier, from, to).await?;
        Ok(engine::summarize_periods(&payments))
    }

    /// Close the settlement window anchored at `today` for every active
    /// supplier. Safe to re-run: only still-unassigned payments move.
    pub async fn close_period_for_all(&self, today: NaiveDate) -> Result<u64, AppError> {
        let period = SettlementPeriod::from_date(today).map_err(period_error)?;
        let suppliers = self.repo.list_active_suppliers().await?;

        let assignments = suppliers
            .iter()
            .map(|supplier| self.repo.assign_period(supplier.id, period));
        let total: u64 = try_join_all(assignments).await?.into_iter().sum();

        info!(
            period = %period,
            suppliers = suppliers.len(),
            assigned = total,
            "Settlement window closed"
        );
        Ok(total)
    }
}

fn period_error(err: PeriodError) -> AppError {
    AppError::InvalidPeriod(err.to_string())
}
