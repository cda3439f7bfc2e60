//! Event emission for notification and commission flows.
//!
//! Services emit `CargoEvent`s through the `EventSink` trait; failures are
//! logged and never propagate into the primary write path.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub mod bus;
pub mod events;
pub mod mock;
pub mod sms;

pub use bus::EventBus;
pub use events::CargoEvent;
pub use mock::MockEventSink;
pub use sms::SmsNotifier;

/// Error type for event delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Event channel closed")]
    ChannelClosed,
    #[error("Gateway error: {0}")]
    Gateway(String),
}

/// Consumer of outbound events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: CargoEvent) -> Result<(), NotifyError>;
}

/// Emit an event, logging delivery failure instead of surfacing it.
pub async fn emit_best_effort(sink: &dyn EventSink, event: CargoEvent) {
    let name = event.name();
    if let Err(e) = sink.emit(event).await {
        warn!(event = name, error = %e, "Event delivery failed, continuing");
    }
}
