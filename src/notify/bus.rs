//! In-process event bus.
//!
//! `EventBus` is the sink services emit into; the receiving end is drained by
//! a dispatcher task wired up in main, which fans events out to the SMS
//! notifier and the commission listener.

use super::{CargoEvent, EventSink, NotifyError};
use async_trait::async_trait;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EventBus {
    sender: mpsc::UnboundedSender<CargoEvent>,
}

impl EventBus {
    /// Create a bus and hand back the consuming end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CargoEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (EventBus { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for EventBus {
    async fn emit(&self, event: CargoEvent) -> Result<(), NotifyError> {
        self.sender
            .send(event)
            .map_err(|_| NotifyError::ChannelClosed)
    }
}
