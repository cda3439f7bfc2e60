//! Event dispatcher bridging the bus to its consumers.
//!
//! Drains the bus receiver, routes `cargo.apply.commissions` into the
//! commission engine, and forwards everything to the notifier. All handling
//! is best-effort: a failed consumer never stops the loop.

use crate::notify::{emit_best_effort, CargoEvent, EventSink};
use crate::service::CommissionService;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::error;

pub fn spawn_event_dispatcher(
    mut receiver: UnboundedReceiver<CargoEvent>,
    notifier: Arc<dyn EventSink>,
    commission: Arc<CommissionService>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let CargoEvent::ApplyCommissions { cargo_id } = &event {
                if let Err(e) = commission.apply_commissions(*cargo_id).await {
                    error!(cargo_id = cargo_id.as_i64(), error = %e, "Commission application failed");
                }
            }

            emit_best_effort(&*notifier, event).await;
        }
    })
}
