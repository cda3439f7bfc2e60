//! Outbound domain events.

use crate::domain::{CargoId, CargoStatus, SupplierId, TrackingNumber};
use serde::Serialize;

/// Events emitted by cargo creation and lifecycle transitions.
///
/// Fire-and-forget, at most once per triggering action. Consumed by the SMS
/// notifier (customer/supplier-facing variants) and the commission listener
/// (ApplyCommissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum CargoEvent {
    CargoCreated {
        tracking_number: TrackingNumber,
        user_phone: String,
        supplier_name: String,
    },
    CargoCreatedForSupplier {
        tracking_number: TrackingNumber,
        supplier_phone: String,
        /// Public tracking link shared with the supplier.
        tracking_link: String,
    },
    CargoStatusUpdated {
        tracking_number: TrackingNumber,
        new_status: CargoStatus,
        user_phone: String,
        supplier_name: String,
    },
    ApplyCommissions {
        cargo_id: CargoId,
    },
    NewSupplierReview {
        cargo_id: CargoId,
        supplier_id: SupplierId,
    },
}

impl CargoEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            CargoEvent::CargoCreated { .. } => "cargo.created",
            CargoEvent::CargoCreatedForSupplier { .. } => "cargo.created.supplier",
            CargoEvent::CargoStatusUpdated { .. } => "cargo.status.updated",
            CargoEvent::ApplyCommissions { .. } => "cargo.apply.commissions",
            CargoEvent::NewSupplierReview { .. } => "new.cargo.supplier.review",
        }
    }
}
