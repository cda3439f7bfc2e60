//! Recording event sink for tests.

use super::{CargoEvent, EventSink, NotifyError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every emitted event for later assertions.
#[derive(Debug, Default)]
pub struct MockEventSink {
    events: Mutex<Vec<CargoEvent>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<CargoEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl EventSink for MockEventSink {
    async fn emit(&self, event: CargoEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
        Ok(())
    }
}
