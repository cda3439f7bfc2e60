//! Service layer orchestrating repository, engines, and events.

pub mod cargo;
pub mod commission;
pub mod coupon;
pub mod dispatcher;
pub mod pricing;
pub mod scheduler;

pub use cargo::{CargoSelector, CargoService, CreateCargoRequest, TrackedCargo};
pub use commission::{CommissionService, SupplierStats};
pub use coupon::CouponService;
pub use pricing::{Actor, PricingService};
pub use scheduler::spawn_settlement_job;
