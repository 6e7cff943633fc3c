//! Turns "request this movie/show" calls into exactly one request against the
//! media request service.
//!
//! A direct media id always wins over a name. A name is resolved through the
//! service's search and the first hit is taken as-is. Missing input and empty
//! searches are logged and skipped; errors from the service are returned.

use media_request_client::{ClientError, MediaRequestService};
use media_request_models::{MediaType, SeasonMode};
use std::sync::Arc;
use tracing::{info, warn};

/// Why a request call was not made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a name nor a media id was supplied
    MissingInput,
    /// The name search returned no results
    NotFound { name: String },
    /// The season value is not one of first, latest or all
    UnknownSeasonMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Submitted { media_id: String },
    Skipped(SkipReason),
}

enum Target {
    Id(String),
    Skip(SkipReason),
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct RequestDispatcher {
    service: Arc<dyn MediaRequestService>,
}

impl RequestDispatcher {
    pub fn new(service: Arc<dyn MediaRequestService>) -> Self {
        Self { service }
    }

    pub async fn submit_movie_request(
        &self,
        name: Option<&str>,
        media_id: Option<&str>,
    ) -> Result<DispatchOutcome, ClientError> {
        let media_id = match self.resolve_target(name, media_id, MediaType::Movie).await? {
            Target::Id(id) => id,
            Target::Skip(reason) => return Ok(DispatchOutcome::Skipped(reason)),
        };

        self.service.request_movie(&media_id).await?;
        info!(operation = "submit_movie_request", media_id = %media_id, "Movie request submitted");
        Ok(DispatchOutcome::Submitted { media_id })
    }

    /// Request a show. `season` must be "first", "latest" or "all"; anything
    /// else is logged and nothing is requested.
    pub async fn submit_tv_request(
        &self,
        name: Option<&str>,
        media_id: Option<&str>,
        season: &str,
    ) -> Result<DispatchOutcome, ClientError> {
        let media_id = match self.resolve_target(name, media_id, MediaType::Tv).await? {
            Target::Id(id) => id,
            Target::Skip(reason) => return Ok(DispatchOutcome::Skipped(reason)),
        };

        let mode: SeasonMode = match season.parse() {
            Ok(mode) => mode,
            Err(e) => {
                warn!("Not requesting TV show {}: {}", media_id, e);
                return Ok(DispatchOutcome::Skipped(SkipReason::UnknownSeasonMode(season.to_string())));
            }
        };

        self.service.request_tv(&media_id, mode).await?;
        info!(
            operation = "submit_tv_request",
            media_id = %media_id,
            season = %mode,
            "TV request submitted"
        );
        Ok(DispatchOutcome::Submitted { media_id })
    }

    /// Forward a status change as-is; the remote service validates the status.
    pub async fn update_request(&self, request_id: &str, new_status: &str) -> Result<(), ClientError> {
        self.service.update_request(request_id, new_status).await
    }

    async fn resolve_target(
        &self,
        name: Option<&str>,
        media_id: Option<&str>,
        media_type: MediaType,
    ) -> Result<Target, ClientError> {
        let label = match media_type {
            MediaType::Tv => "TV show",
            _ => "movie",
        };

        if let Some(id) = non_empty(media_id) {
            return Ok(Target::Id(id.to_string()));
        }

        let Some(name) = non_empty(name) else {
            warn!("No {} name or id provided", label);
            return Ok(Target::Skip(SkipReason::MissingInput));
        };

        let results = match media_type {
            MediaType::Tv => self.service.search_tv(name).await?,
            _ => self.service.search_movie(name).await?,
        };

        match results.first() {
            Some(hit) => Ok(Target::Id(hit.id.to_string())),
            None => {
                warn!("No {} found for {}", label, name);
                Ok(Target::Skip(SkipReason::NotFound {
                    name: name.to_string(),
                }))
            }
        }
    }
}
