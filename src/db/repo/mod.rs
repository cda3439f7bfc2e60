//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `catalog.rs` - suppliers, locations, cargo types, customer addresses
//! - `pricing.rs` - pricing rows and their price fields
//! - `cargo.rs` - cargo orders, items, and tracking history
//! - `coupons.rs` - coupon storage and lookup
//! - `payments.rs` - commission payments and period batches
//!
//! Decimals are stored as canonical strings and summed in Rust; SQLite's SUM
//! returns REAL and would lose precision for monetary values.

mod cargo;
mod catalog;
mod coupons;
mod payments;
mod pricing;

pub use catalog::{NewAddress, NewSupplier};

use crate::domain::Decimal;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqlitePool;
use std::str::FromStr;
use tracing::warn;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

/// Uniform RFC 3339 rendering (fixed millisecond precision, explicit offset)
/// so stored timestamps compare correctly as strings.
pub(crate) fn fmt_datetime(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, false)
}

pub(crate) fn parse_datetime(field: &str, s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(field = field, value = s, error = %e, "Failed to parse stored datetime, using epoch");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

pub(crate) fn parse_decimal(field: &str, s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|e| {
        warn!(field = field, value = s, error = %e, "Failed to parse stored decimal, using default");
        Decimal::default()
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Repository;
    use crate::db::migrations::init_db;
    use tempfile::TempDir;

    pub async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }
}
