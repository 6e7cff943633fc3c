//! Builds the request service described by the configuration.

use anyhow::Result;
use media_request_config::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{MediaRequestService, OverseerrClient};

/// Validate the configuration and connect an Overseerr client.
///
/// Performs the local login when a username and password are configured.
pub async fn connect_from_config(config: &Config) -> Result<Arc<dyn MediaRequestService>> {
    config.validate()?;

    let timeout = Duration::from_secs(config.http.timeout_seconds);
    let client = OverseerrClient::connect(&config.overseerr, timeout).await?;

    info!(
        operation = "client_connected",
        api_url = client.api_url(),
        "Overseerr client ready"
    );

    Ok(Arc::new(client))
}
