//! Calendar-scheduled settlement-window close.
//!
//! Fires at midnight on the 1st and 15th of each month and assigns the new
//! period across all active suppliers. Duplicate firings are harmless: period
//! assignment only moves still-unassigned payments.

use crate::service::CommissionService;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Next period anchor strictly after the given date.
pub fn next_boundary(after: NaiveDate) -> NaiveDate {
    if after.day() < 15 {
        // 15th always exists
        NaiveDate::from_ymd_opt(after.year(), after.month(), 15).unwrap_or(after)
    } else {
        let (year, month) = if after.month() == 12 {
            (after.year() + 1, 1)
        } else {
            (after.year(), after.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(after)
    }
}

/// Spawn the settlement job loop.
pub fn spawn_settlement_job(commission: Arc<CommissionService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let boundary = next_boundary(now.date_naive());
            let fire_at = boundary.and_time(NaiveTime::MIN);
            let wait = (fire_at - now.naive_utc())
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);

            info!(boundary = %boundary, wait_secs = wait.as_secs(), "Settlement job sleeping until next window");
            tokio::time::sleep(wait).await;

            match commission.close_period_for_all(boundary).await {
                Ok(assigned) => {
                    info!(boundary = %boundary, assigned = assigned, "Settlement job run complete")
                }
                Err(e) => error!(boundary = %boundary, error = %e, "Settlement job run failed"),
            }
        }
    })
}
