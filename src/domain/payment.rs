//! Supplier commission payments and settlement periods.
//!
//! Settlement windows are anchored on the 1st and 15th of each month; a
//! payment belongs to exactly one period once assigned.

use crate::domain::{CargoId, Decimal, SupplierId};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("settlement period must fall on the 1st or 15th of a month, got day {0}")]
    NotABoundary(u32),
}

/// A settlement-period anchor date: the 1st or 15th of some month, with
/// time-of-day truncated away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettlementPeriod(NaiveDate);

impl SettlementPeriod {
    /// Validate a date as a period anchor. Fails unless the day is the
    /// 1st or the 15th.
    pub fn from_date(date: NaiveDate) -> Result<Self, PeriodError> {
        match date.day() {
            1 | 15 => Ok(SettlementPeriod(date)),
            other => Err(PeriodError::NotABoundary(other)),
        }
    }

    /// Validate a timestamp as a period anchor, truncating time-of-day.
    pub fn from_datetime(at: DateTime<Utc>) -> Result<Self, PeriodError> {
        Self::from_date(at.date_naive())
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for SettlementPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One commission record per cargo, created when commissions are applied.
///
/// Monetary fields are immutable after creation; only `period` and `status`
/// change, via batch operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayment {
    pub supplier_id: SupplierId,
    pub cargo_id: CargoId,
    pub created_at: DateTime<Utc>,
    pub period: Option<SettlementPeriod>,
    /// What the customer paid: cargo.total_fee.
    pub revenue: Decimal,
    /// What the supplier keeps: cargo.fee minus the supplier commission.
    pub profit: Decimal,
    pub supplier_commission: Decimal,
    /// Platform share collected from the customer: cargo.service_fee.
    pub customer_commission: Decimal,
    /// supplier_commission + customer_commission.
    pub commission: Decimal,
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_accepts_boundaries() {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let fifteenth = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert!(SettlementPeriod::from_date(first).is_ok());
        assert!(SettlementPeriod::from_date(fifteenth).is_ok());
    }

    #[test]
    fn test_period_rejects_other_days() {
        let second = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(
            SettlementPeriod::from_date(second),
            Err(PeriodError::NotABoundary(2))
        );
    }

    #[test]
    fn test_datetime_truncated_to_midnight() {
        let at = Utc.with_ymd_and_hms(2026, 3, 15, 13, 45, 12).unwrap();
        let period = SettlementPeriod::from_datetime(at).unwrap();
        assert_eq!(period.to_string(), "2026-03-15");
    }

    #[test]
    fn test_period_ordering_follows_dates() {
        let first = SettlementPeriod::from_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .unwrap();
        let fifteenth =
            SettlementPeriod::from_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()).unwrap();
        assert!(first < fifteenth);
    }
}
