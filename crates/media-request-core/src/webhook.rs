use serde_json::Value;
use tracing::debug;

use crate::sensors::{RefreshReport, SensorRefreshTrigger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Body was not JSON; nothing happened
    Ignored,
    Refreshed(RefreshReport),
}

/// Inbound notifications from the request service.
///
/// The payload is not interpreted: any well-formed JSON body refreshes all
/// request sensors.
#[derive(Clone)]
pub struct WebhookHandler {
    trigger: SensorRefreshTrigger,
}

impl WebhookHandler {
    pub fn new(trigger: SensorRefreshTrigger) -> Self {
        Self { trigger }
    }

    pub async fn handle(&self, body: &[u8]) -> WebhookOutcome {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Ignoring webhook with invalid JSON body: {}", e);
                return WebhookOutcome::Ignored;
            }
        };

        let notification_type = payload
            .get("notification_type")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        debug!(notification_type = notification_type, "Webhook received: {}", payload);

        WebhookOutcome::Refreshed(self.trigger.refresh().await)
    }
}
