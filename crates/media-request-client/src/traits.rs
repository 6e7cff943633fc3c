use async_trait::async_trait;
use media_request_models::{IssueCounts, RequestCounts, SearchResults, SeasonMode};

use crate::ClientError;

/// Operations offered by a media request service (Overseerr and compatibles).
///
/// Implementations hold their own session state; callers share one instance
/// behind an `Arc` and never mutate it.
#[async_trait]
pub trait MediaRequestService: Send + Sync {
    fn service_name(&self) -> &str;

    // Catalog lookups
    async fn search_movie(&self, query: &str) -> Result<SearchResults, ClientError>;
    async fn search_tv(&self, query: &str) -> Result<SearchResults, ClientError>;

    // Requests
    async fn request_movie(&self, media_id: &str) -> Result<(), ClientError>;
    async fn request_tv(&self, media_id: &str, seasons: SeasonMode) -> Result<(), ClientError>;

    /// Change the status of an existing request. The status is not validated locally.
    async fn update_request(&self, request_id: &str, status: &str) -> Result<(), ClientError>;

    // Counters backing the sensors
    async fn request_counts(&self) -> Result<RequestCounts, ClientError>;
    async fn issue_counts(&self) -> Result<IssueCounts, ClientError>;
}
