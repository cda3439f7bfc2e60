//! SMS delivery over an HTTP gateway.
//!
//! Renders customer- and supplier-facing events into short message texts and
//! posts them to the configured gateway. Internal events pass through
//! untouched.

use super::{CargoEvent, EventSink, NotifyError};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

pub struct SmsNotifier {
    gateway_url: Option<String>,
    client: reqwest::Client,
}

impl SmsNotifier {
    /// With no gateway URL the notifier logs messages instead of sending.
    pub fn new(gateway_url: Option<String>) -> Self {
        Self {
            gateway_url,
            client: reqwest::Client::new(),
        }
    }

    fn render(event: &CargoEvent) -> Option<(String, String)> {
        match event {
            CargoEvent::CargoCreated {
                tracking_number,
                user_phone,
                supplier_name,
            } => Some((
                user_phone.clone(),
                format!(
                    "Your cargo {} was registered with {}.",
                    tracking_number, supplier_name
                ),
            )),
            CargoEvent::CargoCreatedForSupplier {
                tracking_number,
                supplier_phone,
                tracking_link,
            } => Some((
                supplier_phone.clone(),
                format!(
                    "New cargo request {}. Track it at {}",
                    tracking_number, tracking_link
                ),
            )),
            CargoEvent::CargoStatusUpdated {
                tracking_number,
                new_status,
                user_phone,
                supplier_name,
            } => Some((
                user_phone.clone(),
                format!(
                    "Cargo {} with {} is now {}.",
                    tracking_number, supplier_name, new_status
                ),
            )),
            // Internal events carry no SMS.
            CargoEvent::ApplyCommissions { .. } | CargoEvent::NewSupplierReview { .. } => None,
        }
    }

    async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let Some(url) = &self.gateway_url else {
            info!(to = to, body = body, "SMS gateway not configured, logging only");
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(&json!({ "to": to, "body": body }))
            .send()
            .await
            .map_err(|e| NotifyError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Gateway(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EventSink for SmsNotifier {
    async fn emit(&self, event: CargoEvent) -> Result<(), NotifyError> {
        match Self::render(&event) {
            Some((to, body)) => self.send(&to, &body).await,
            None => {
                debug!(event = event.name(), "No SMS rendering for event");
                Ok(())
            }
        }
    }
}
