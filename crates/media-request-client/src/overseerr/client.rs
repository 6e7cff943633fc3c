use async_trait::async_trait;
use chrono::Utc;
use media_request_config::OverseerrConfig;
use media_request_models::{IssueCounts, MediaType, RequestCounts, SearchResults, SeasonMode};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::overseerr::api::{self, MediaRequestBody, Seasons};
use crate::overseerr::auth;
use crate::{ClientError, MediaRequestService};

#[derive(Clone)]
pub struct OverseerrClient {
    client: Arc<Client>,
    api_url: String,
}

impl OverseerrClient {
    /// Build a client without contacting the server
    pub fn new(config: &OverseerrConfig, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: Arc::new(auth::create_overseerr_client(&config.api_key, timeout)?),
            api_url: config.api_url(),
        })
    }

    /// Build a client and, when a username and password are configured, sign in
    pub async fn connect(config: &OverseerrConfig, timeout: Duration) -> Result<Self, ClientError> {
        let client = Self::new(config, timeout)?;
        if let Some((username, password)) = config.login() {
            auth::login(&client.client, &client.api_url, username, password).await?;
        }
        Ok(client)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn search_by_type(&self, query: &str, media_type: MediaType) -> Result<SearchResults, ClientError> {
        let results = api::search(&self.client, &self.api_url, query, 1).await?;
        Ok(api::retain_media_type(results, media_type))
    }
}

#[async_trait]
impl MediaRequestService for OverseerrClient {
    fn service_name(&self) -> &str {
        "overseerr"
    }

    async fn search_movie(&self, query: &str) -> Result<SearchResults, ClientError> {
        self.search_by_type(query, MediaType::Movie).await
    }

    async fn search_tv(&self, query: &str) -> Result<SearchResults, ClientError> {
        self.search_by_type(query, MediaType::Tv).await
    }

    async fn request_movie(&self, media_id: &str) -> Result<(), ClientError> {
        let id = api::parse_media_id(media_id)?;
        api::create_request(&self.client, &self.api_url, &MediaRequestBody::movie(id)).await?;
        info!("Requested movie {}", id);
        Ok(())
    }

    async fn request_tv(&self, media_id: &str, seasons: SeasonMode) -> Result<(), ClientError> {
        let id = api::parse_media_id(media_id)?;

        // "all" is understood by the server; first/latest need the season list
        let selection = match seasons {
            SeasonMode::All => Seasons::all(),
            mode => {
                let details = api::get_tv_details(&self.client, &self.api_url, id).await?;
                api::select_seasons(mode, &details, Utc::now().date_naive())?
            }
        };

        api::create_request(&self.client, &self.api_url, &MediaRequestBody::tv(id, selection)).await?;
        info!("Requested TV show {} ({} season)", id, seasons);
        Ok(())
    }

    async fn update_request(&self, request_id: &str, status: &str) -> Result<(), ClientError> {
        api::update_request_status(&self.client, &self.api_url, request_id, status).await?;
        info!("Request {} set to {}", request_id, status);
        Ok(())
    }

    async fn request_counts(&self) -> Result<RequestCounts, ClientError> {
        api::get_request_counts(&self.client, &self.api_url).await
    }

    async fn issue_counts(&self) -> Result<IssueCounts, ClientError> {
        api::get_issue_counts(&self.client, &self.api_url).await
    }
}
