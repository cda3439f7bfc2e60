pub mod cargo;
pub mod coupon;
pub mod health;
pub mod payments;
pub mod pricing;
pub mod tracking;

use crate::config::Config;
use crate::db::Repository;
use crate::service::{CargoService, CommissionService, CouponService, PricingService};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub cargo_service: Arc<CargoService>,
    pub pricing_service: Arc<PricingService>,
    pub coupon_service: Arc<CouponService>,
    pub commission_service: Arc<CommissionService>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/cargo", post(cargo::create_cargo).get(cargo::list_cargos))
        .route("/cargo/:id", get(cargo::get_cargo))
        .route("/cargo/:id/status", put(cargo::update_status))
        .route(
            "/cargo/tracking/:tracking_number/status",
            put(cargo::update_status_by_tracking),
        )
        .route(
            "/cargo/supplier/:supplier_id/cargo-detail/:cargo_id",
            put(cargo::supplier_update_status),
        )
        .route("/cargo-status/transitions", get(cargo::transition_table))
        .route("/track-cargo/:tracking_number", get(tracking::track_cargo))
        .route("/cargo-pricing", post(pricing::create_pricing))
        .route("/cargo-pricing/:id", put(pricing::update_pricing))
        .route(
            "/cargo-pricing/supplier/:supplier_id",
            get(pricing::list_for_supplier),
        )
        .route("/coupon", post(coupon::create_coupon))
        .route("/coupon/:code", get(coupon::get_coupon))
        .route("/supplier/:id/stats", get(payments::supplier_stats))
        .route(
            "/supplier/:id/payment-periods",
            get(payments::payment_periods),
        )
        .route(
            "/supplier/:id/assign-period",
            post(payments::assign_period),
        )
        .route(
            "/payment-period/status",
            post(payments::set_period_status),
        )
        .layer(cors)
        .with_state(state)
}
