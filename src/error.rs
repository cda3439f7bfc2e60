use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error taxonomy.
///
/// Every variant maps to a stable machine-readable code surfaced in the
/// JSON error body, so clients can branch on `code` rather than message text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Location not serviced by supplier: {0}")]
    ServiceArea(String),
    #[error("No pricing found: {0}")]
    PricingNotFound(String),
    #[error("Unsupported cargo type: {0}")]
    UnsupportedCargoType(String),
    #[error("Total weight below supplier minimum: {0}")]
    MinWeight(String),
    #[error("Invalid coupon: {0}")]
    CouponInvalid(String),
    #[error("Invalid settlement period: {0}")]
    InvalidPeriod(String),
}

impl AppError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG",
            AppError::Internal(_) => "INTERNAL",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::ServiceArea(_) => "SERVICE_AREA",
            AppError::PricingNotFound(_) => "PRICING_NOT_FOUND",
            AppError::UnsupportedCargoType(_) => "UNSUPPORTED_CARGO_TYPE",
            AppError::MinWeight(_) => "MIN_WEIGHT",
            AppError::CouponInvalid(_) => "COUPON_INVALID",
            AppError::InvalidPeriod(_) => "INVALID_PERIOD",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PricingNotFound(_) | AppError::UnsupportedCargoType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
