use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{PaymentStatus, SupplierId};
use crate::engine::PeriodSummary;
use crate::error::AppError;
use crate::service::SupplierStats;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WindowQuery {
    fn resolve(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let from = match &self.from {
            Some(s) => parse_datetime_param("from", s)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };
        let to = match &self.to {
            Some(s) => parse_datetime_param("to", s)?,
            None => Utc::now(),
        };
        Ok((from, to))
    }
}

/// Accepts RFC 3339 timestamps or bare dates (taken at midnight UTC).
fn parse_datetime_param(name: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(AppError::Validation(format!(
        "{} must be an RFC 3339 timestamp or YYYY-MM-DD date, got {}",
        name, value
    )))
}

pub async fn supplier_stats(
    Path(id): Path<i64>,
    Query(query): Query<WindowQuery>,
    State(state): State<AppState>,
) -> Result<Json<SupplierStats>, AppError> {
    let (from, to) = query.resolve()?;
    let stats = state
        .commission_service
        .supplier_stats(SupplierId::new(id), from, to)
        .await?;
    Ok(Json(stats))
}

pub async fn payment_periods(
    Path(id): Path<i64>,
    Query(query): Query<WindowQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PeriodSummary>>, AppError> {
    let (from, to) = query.resolve()?;
    let periods = state
        .commission_service
        .list_payment_periods(SupplierId::new(id), from, to)
        .await?;
    Ok(Json(periods))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPeriodBody {
    /// Period anchor: must land on the 1st or 15th of a month.
    pub period: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPeriodResponse {
    pub assigned: u64,
}

pub async fn assign_period(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<AssignPeriodBody>,
) -> Result<Json<AssignPeriodResponse>, AppError> {
    let at = parse_datetime_param("period", &body.period)?;
    let assigned = state
        .commission_service
        .assign_payment_period(SupplierId::new(id), at)
        .await?;
    Ok(Json(AssignPeriodResponse { assigned }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatusBody {
    pub period: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatusResponse {
    pub updated: u64,
}

pub async fn set_period_status(
    State(state): State<AppState>,
    Json(body): Json<PeriodStatusBody>,
) -> Result<Json<PeriodStatusResponse>, AppError> {
    let at = parse_datetime_param("period", &body.period)?;
    let updated = state
        .commission_service
        .set_period_payment_status(at, body.status)
        .await?;
    Ok(Json(PeriodStatusResponse { updated }))
}
