pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod service;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Cargo, CargoMethod, CargoStatus, Coupon, Decimal, PaymentStatus, SettlementPeriod, Supplier,
    SupplierId, TrackingNumber,
};
pub use error::AppError;
