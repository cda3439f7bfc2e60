//! Commission payment storage and settlement-period batch operations.

use super::{fmt_datetime, parse_datetime, parse_decimal, Repository};
use crate::domain::{
    CargoId, PaymentStatus, SettlementPeriod, SupplierId, SupplierPayment,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

fn period_to_string(period: SettlementPeriod) -> String {
    period.as_date().format("%Y-%m-%d").to_string()
}

/// Midnight at the period anchor, rendered like stored timestamps so the
/// `created_at <= boundary` comparison works as strings.
fn period_boundary_string(period: SettlementPeriod) -> String {
    format!("{}T00:00:00.000+00:00", period.as_date().format("%Y-%m-%d"))
}

fn payment_from_row(row: &SqliteRow) -> SupplierPayment {
    let created_at: String = row.get("created_at");
    let revenue: String = row.get("revenue");
    let profit: String = row.get("profit");
    let supplier_commission: String = row.get("supplier_commission");
    let customer_commission: String = row.get("customer_commission");
    let commission: String = row.get("commission");
    let status: String = row.get("payment_status");

    let period = row.get::<Option<String>, _>("period").and_then(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .ok()
            .and_then(|d| SettlementPeriod::from_date(d).ok())
            .or_else(|| {
                warn!(value = %s, "Invalid stored settlement period, treating as unassigned");
                None
            })
    });

    SupplierPayment {
        supplier_id: SupplierId::new(row.get("supplier_id")),
        cargo_id: CargoId::new(row.get("cargo_id")),
        created_at: parse_datetime("created_at", &created_at),
        period,
        revenue: parse_decimal("revenue", &revenue),
        profit: parse_decimal("profit", &profit),
        supplier_commission: parse_decimal("supplier_commission", &supplier_commission),
        customer_commission: parse_decimal("customer_commission", &customer_commission),
        commission: parse_decimal("commission", &commission),
        status: PaymentStatus::parse(&status).unwrap_or_else(|| {
            warn!(value = %status, "Unknown payment status in store, defaulting to PENDING");
            PaymentStatus::Pending
        }),
    }
}

impl Repository {
    /// Insert a payment record idempotently: one payment per cargo, a second
    /// attempt for the same cargo is ignored.
    ///
    /// Returns true when a new row was inserted.
    pub async fn insert_payment(&self, payment: &SupplierPayment) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO supplier_payments
            (supplier_id, cargo_id, created_at, period, revenue, profit,
             supplier_commission, customer_commission, commission, payment_status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(cargo_id) DO NOTHING
            "#,
        )
        .bind(payment.supplier_id.as_i64())
        .bind(payment.cargo_id.as_i64())
        .bind(fmt_datetime(payment.created_at))
        .bind(payment.period.map(period_to_string))
        .bind(payment.revenue.to_canonical_string())
        .bind(payment.profit.to_canonical_string())
        .bind(payment.supplier_commission.to_canonical_string())
        .bind(payment.customer_commission.to_canonical_string())
        .bind(payment.commission.to_canonical_string())
        .bind(payment.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_payment_for_cargo(
        &self,
        cargo_id: CargoId,
    ) -> Result<Option<SupplierPayment>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM supplier_payments WHERE cargo_id = ?")
            .bind(cargo_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| payment_from_row(&r)))
    }

    /// Assign a settlement period to a supplier's pending, unassigned
    /// payments created at or before the period anchor.
    ///
    /// Already-assigned rows are never touched, which makes re-runs for the
    /// same period no-ops.
    ///
    /// Returns the number of payments newly assigned.
    pub async fn assign_period(
        &self,
        supplier: SupplierId,
        period: SettlementPeriod,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE supplier_payments
            SET period = ?
            WHERE supplier_id = ?
              AND payment_status = 'PENDING'
              AND period IS NULL
              AND created_at <= ?
            "#,
        )
        .bind(period_to_string(period))
        .bind(supplier.as_i64())
        .bind(period_boundary_string(period))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set the payment status for every payment in a period, all suppliers.
    ///
    /// Returns the number of payments updated.
    pub async fn set_period_status(
        &self,
        period: SettlementPeriod,
        status: PaymentStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE supplier_payments SET payment_status = ? WHERE period = ?")
            .bind(status.as_str())
            .bind(period_to_string(period))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// A supplier's payments created inside a time window, oldest first.
    pub async fn query_payments(
        &self,
        supplier: SupplierId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SupplierPayment>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM supplier_payments
            WHERE supplier_id = ? AND created_at >= ? AND created_at <= ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(supplier.as_i64())
        .bind(fmt_datetime(from))
        .bind(fmt_datetime(to))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(payment_from_row).collect())
    }
}
