//! Catalog records: suppliers, locations, cargo types, customer addresses.
//!
//! These are flat reference records resolved by key lookup; the only logic
//! they carry is the two-level cargo-type taxonomy (leaf check).

use crate::domain::{AddressId, CargoTypeId, Decimal, LocationId, SupplierId, UserId};
use serde::{Deserialize, Serialize};

/// Cargo supplier (carrier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub phone: String,
    /// Minimum chargeable total weight for a single cargo.
    pub min_weight: Decimal,
    /// Delivery estimate range in days.
    pub delivery_estimation_min: i64,
    pub delivery_estimation_max: i64,
    /// Token granting unmasked access to public tracking responses.
    pub auth_token: String,
    pub active: bool,
    /// Union of destination sets across this supplier's pricing rows.
    /// Recomputed whenever a pricing row changes.
    pub serviced_destinations: Vec<LocationId>,
}

/// Administrative location (city/region) a route can start or end at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// Cargo-type catalog entry. Parent types group leaf types; only leaf
/// types (no children) are orderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoType {
    pub id: CargoTypeId,
    pub name: String,
    pub parent_id: Option<CargoTypeId>,
}

/// Customer address-book entry; snapshot source for cargo addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub contact_name: String,
    pub contact_surname: String,
    pub phone: String,
    pub line: String,
    pub city: String,
    pub location_id: LocationId,
}
