//! Cargo order, its items, address snapshots, and tracking history.

use crate::domain::primitives::CargoMethod;
use crate::domain::{
    CargoId, CargoTypeId, Decimal, LocationId, SupplierId, TrackingNumber, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cargo order status.
///
/// Forward chain runs NewRequest through Delivered; Cancelled and Rejected
/// are terminal from any pre-Shipped state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoStatus {
    NewRequest,
    AwaitingPickup,
    Received,
    AwaitingShipment,
    Shipped,
    ArrivedAtDestinationCountry,
    AwaitingDelivery,
    Delivered,
    Cancelled,
    Rejected,
}

impl CargoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoStatus::NewRequest => "NEW_REQUEST",
            CargoStatus::AwaitingPickup => "AWAITING_PICKUP",
            CargoStatus::Received => "RECEIVED",
            CargoStatus::AwaitingShipment => "AWAITING_SHIPMENT",
            CargoStatus::Shipped => "SHIPPED",
            CargoStatus::ArrivedAtDestinationCountry => "ARRIVED_AT_DESTINATION_COUNTRY",
            CargoStatus::AwaitingDelivery => "AWAITING_DELIVERY",
            CargoStatus::Delivered => "DELIVERED",
            CargoStatus::Cancelled => "CANCELLED",
            CargoStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_REQUEST" => Some(CargoStatus::NewRequest),
            "AWAITING_PICKUP" => Some(CargoStatus::AwaitingPickup),
            "RECEIVED" => Some(CargoStatus::Received),
            "AWAITING_SHIPMENT" => Some(CargoStatus::AwaitingShipment),
            "SHIPPED" => Some(CargoStatus::Shipped),
            "ARRIVED_AT_DESTINATION_COUNTRY" => Some(CargoStatus::ArrivedAtDestinationCountry),
            "AWAITING_DELIVERY" => Some(CargoStatus::AwaitingDelivery),
            "DELIVERED" => Some(CargoStatus::Delivered),
            "CANCELLED" => Some(CargoStatus::Cancelled),
            "REJECTED" => Some(CargoStatus::Rejected),
            _ => None,
        }
    }

    /// Statuses that count as in-progress for supplier statistics:
    /// everything except new requests and the terminal states.
    pub fn is_in_progress(&self) -> bool {
        !matches!(
            self,
            CargoStatus::NewRequest
                | CargoStatus::Delivered
                | CargoStatus::Cancelled
                | CargoStatus::Rejected
        )
    }
}

impl std::fmt::Display for CargoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of a cargo order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoItem {
    pub cargo_type: CargoTypeId,
    pub weight: Decimal,
    pub qty: i64,
}

/// Address copied by value into the cargo at creation time. Later edits to
/// the customer's address book do not affect existing cargos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    pub contact_name: String,
    pub contact_surname: String,
    pub phone: String,
    pub line: String,
    pub city: String,
}

/// A cargo order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub id: CargoId,
    pub tracking_number: TrackingNumber,
    pub status: CargoStatus,
    pub user_id: UserId,
    pub supplier_id: SupplierId,
    pub cargo_method: CargoMethod,
    pub source_location: LocationId,
    pub destination_location: LocationId,
    pub pickup_address: AddressSnapshot,
    pub delivery_address: AddressSnapshot,
    pub items: Vec<CargoItem>,
    pub total_weight: Decimal,
    /// Goods fee after coupon discount.
    pub fee: Decimal,
    /// Platform service fee.
    pub service_fee: Decimal,
    /// fee + service_fee.
    pub total_fee: Decimal,
    pub coupon_code: Option<String>,
    pub estimated_delivery_date: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub review_eligible: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only tracking-history entry. One at creation, one per accepted
/// status change; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoTracking {
    pub cargo_id: CargoId,
    pub status: CargoStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        let all = [
            CargoStatus::NewRequest,
            CargoStatus::AwaitingPickup,
            CargoStatus::Received,
            CargoStatus::AwaitingShipment,
            CargoStatus::Shipped,
            CargoStatus::ArrivedAtDestinationCountry,
            CargoStatus::AwaitingDelivery,
            CargoStatus::Delivered,
            CargoStatus::Cancelled,
            CargoStatus::Rejected,
        ];
        for status in all {
            assert_eq!(CargoStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CargoStatus::parse("LOST"), None);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&CargoStatus::AwaitingPickup).unwrap();
        assert_eq!(json, "\"AWAITING_PICKUP\"");
    }

    #[test]
    fn test_in_progress_classification() {
        assert!(!CargoStatus::NewRequest.is_in_progress());
        assert!(!CargoStatus::Delivered.is_in_progress());
        assert!(!CargoStatus::Cancelled.is_in_progress());
        assert!(!CargoStatus::Rejected.is_in_progress());
        assert!(CargoStatus::Shipped.is_in_progress());
        assert!(CargoStatus::AwaitingPickup.is_in_progress());
    }
}
