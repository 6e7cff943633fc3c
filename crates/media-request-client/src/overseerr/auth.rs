use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::ClientError;

const API_KEY_HEADER: &str = "x-api-key";

/// Create a reqwest Client that sends the api key on every call.
///
/// The cookie store keeps the session from a local login alive between calls.
pub fn create_overseerr_client(api_key: &str, timeout: Duration) -> Result<Client, ClientError> {
    let mut key = HeaderValue::from_str(api_key.trim())
        .map_err(|e| ClientError::InvalidApiKey(e.to_string()))?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, key);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .user_agent(concat!("overseerr-bridge/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .cookie_store(true)
        .timeout(timeout)
        .build()?;

    Ok(client)
}

#[derive(Debug, Serialize)]
struct LocalLogin<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign in with a local Overseerr account (`POST /auth/local`)
pub async fn login(client: &Client, api_url: &str, username: &str, password: &str) -> Result<(), ClientError> {
    let url = format!("{}/auth/local", api_url);
    debug!(url = %url, "Logging in to Overseerr");

    let response = client
        .post(&url)
        .json(&LocalLogin { email: username, password })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(ClientError::Login(format!("{} - {}", status, error_text)));
    }

    info!("Logged in to Overseerr as {}", username);
    Ok(())
}
