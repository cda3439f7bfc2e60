//! Data-defined cargo status transition table.
//!
//! The table is reference data for client display (allowed next statuses,
//! past statuses, confirmation prompts), looked up by current status. It is
//! advisory on the write path: the lifecycle does not enforce it server-side.

use crate::domain::CargoStatus;
use serde::Serialize;
use std::collections::HashMap;

use CargoStatus::*;

/// Transition metadata for one current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRule {
    /// Statuses the cargo may move to next.
    pub to_statuses: Vec<CargoStatus>,
    /// Statuses the cargo has passed through on the forward chain.
    pub past_statuses: Vec<CargoStatus>,
    /// Statuses a client should render disabled.
    pub next_disabled_statuses: Vec<CargoStatus>,
    /// Prompt text shown before confirming the move out of this status.
    pub confirmation_message: &'static str,
}

/// Lookup table keyed by current status.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: HashMap<CargoStatus, TransitionRule>,
}

const FORWARD_CHAIN: [CargoStatus; 8] = [
    NewRequest,
    AwaitingPickup,
    Received,
    AwaitingShipment,
    Shipped,
    ArrivedAtDestinationCountry,
    AwaitingDelivery,
    Delivered,
];

const ALL_STATUSES: [CargoStatus; 10] = [
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
];

fn confirmation_message(status: CargoStatus) -> &'static str {
    match status {
        NewRequest => "Accept this cargo request and schedule pickup?",
        AwaitingPickup => "Confirm the cargo has been picked up?",
        Received => "Confirm the cargo is ready for shipment?",
        AwaitingShipment => "Confirm the cargo has shipped?",
        Shipped => "Confirm arrival at the destination country?",
        ArrivedAtDestinationCountry => "Confirm the cargo is out for delivery?",
        AwaitingDelivery => "Confirm the cargo has been delivered?",
        Delivered | Cancelled | Rejected => "This cargo is in a final state.",
    }
}

impl TransitionTable {
    /// Build the standard table: each chain status advances to its successor,
    /// pre-Shipped statuses may also cancel or reject.
    pub fn standard() -> Self {
        let mut rules = HashMap::new();

        for (idx, &status) in FORWARD_CHAIN.iter().enumerate() {
            let mut to_statuses = Vec::new();
            if let Some(&next) = FORWARD_CHAIN.get(idx + 1) {
                to_statuses.push(next);
            }
            // Shipped and beyond are committed to delivery.
            if matches!(
                status,
                NewRequest | AwaitingPickup | Received | AwaitingShipment
            ) {
                to_statuses.push(Cancelled);
                to_statuses.push(Rejected);
            }

            let past_statuses: Vec<CargoStatus> = FORWARD_CHAIN[..idx].to_vec();
            let next_disabled_statuses: Vec<CargoStatus> = ALL_STATUSES
                .iter()
                .copied()
                .filter(|s| *s != status && !to_statuses.contains(s))
                .collect();

            rules.insert(
                status,
                TransitionRule {
                    to_statuses,
                    past_statuses,
                    next_disabled_statuses,
                    confirmation_message: confirmation_message(status),
                },
            );
        }

        for terminal in [Cancelled, Rejected] {
            rules.insert(
                terminal,
                TransitionRule {
                    to_statuses: Vec::new(),
                    past_statuses: Vec::new(),
                    next_disabled_statuses: ALL_STATUSES
                        .iter()
                        .copied()
                        .filter(|s| *s != terminal)
                        .collect(),
                    confirmation_message: confirmation_message(terminal),
                },
            );
        }

        TransitionTable { rules }
    }

    pub fn rule(&self, status: CargoStatus) -> Option<&TransitionRule> {
        self.rules.get(&status)
    }

    pub fn rules(&self) -> &HashMap<CargoStatus, TransitionRule> {
        &self.rules
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}
