//! Domain types for the cargo marketplace core.
//!
//! This module provides:
//! - Lossless monetary/weight handling via the Decimal wrapper
//! - Entity id newtypes, CargoMethod, TrackingNumber
//! - Catalog, pricing, coupon, cargo, and payment records
//! - The seedable tracking-number generator

pub mod cargo;
pub mod catalog;
pub mod coupon;
pub mod decimal;
pub mod payment;
pub mod pricing;
pub mod primitives;
pub mod tracking_number;

pub use cargo::{AddressSnapshot, Cargo, CargoItem, CargoStatus, CargoTracking};
pub use catalog::{CargoType, CustomerAddress, Location, Supplier};
pub use coupon::{Coupon, CouponKind, CouponRejection, DiscountType};
pub use decimal::Decimal;
pub use payment::{PaymentStatus, PeriodError, SettlementPeriod, SupplierPayment};
pub use pricing::{CargoPricing, PriceField, PricingMode};
pub use primitives::{
    AddressId, CargoId, CargoMethod, CargoTypeId, LocationId, PricingId, SupplierId,
    TrackingNumber, UserId,
};
pub use tracking_number::{RandomTrackingGenerator, TrackingNumberGenerator};
