//! Per-supplier, per-method, per-route price lists.

use crate::domain::{CargoTypeId, Decimal, LocationId, PricingId, SupplierId};
use crate::domain::primitives::CargoMethod;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a price entry charges: by weight or by item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    PerWeight,
    PerItem,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::PerWeight => "per_weight",
            PricingMode::PerItem => "per_item",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "per_weight" => Some(PricingMode::PerWeight),
            "per_item" => Some(PricingMode::PerItem),
            _ => None,
        }
    }
}

/// One price entry within a pricing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceField {
    pub cargo_type: CargoTypeId,
    pub pricing_mode: PricingMode,
    pub price: Decimal,
    pub commission_rate: Decimal,
    pub courier_pickup: bool,
}

/// A (supplier, method, route) price list with per-cargo-type entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoPricing {
    pub id: PricingId,
    pub supplier_id: SupplierId,
    pub cargo_method: CargoMethod,
    pub price_fields: Vec<PriceField>,
    pub source_locations: Vec<LocationId>,
    pub destination_locations: Vec<LocationId>,
}

impl CargoPricing {
    /// Whether this row prices the given route.
    pub fn covers_route(&self, source: LocationId, destination: LocationId) -> bool {
        self.source_locations.contains(&source)
            && self.destination_locations.contains(&destination)
    }

    /// Find the price entry for a cargo type, if present.
    pub fn price_field(&self, cargo_type: CargoTypeId) -> Option<&PriceField> {
        self.price_fields.iter().find(|f| f.cargo_type == cargo_type)
    }

    /// Whether two rows of the same supplier+method collide: any shared
    /// source paired with any shared destination.
    pub fn overlaps_route(&self, other: &CargoPricing) -> bool {
        let shares_source = self
            .source_locations
            .iter()
            .any(|s| other.source_locations.contains(s));
        let shares_destination = self
            .destination_locations
            .iter()
            .any(|d| other.destination_locations.contains(d));
        shares_source && shares_destination
    }

    /// First cargo type appearing more than once in the price list, if any.
    pub fn duplicate_cargo_type(&self) -> Option<CargoTypeId> {
        let mut seen = HashSet::new();
        for field in &self.price_fields {
            if !seen.insert(field.cargo_type) {
                return Some(field.cargo_type);
            }
        }
        None
    }
}
