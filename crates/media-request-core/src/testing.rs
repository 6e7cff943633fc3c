//! In-memory doubles for the request service and the entity updater.

use async_trait::async_trait;
use media_request_client::{ClientError, MediaRequestService};
use media_request_models::{IssueCounts, MediaSearchResult, RequestCounts, SearchResults, SeasonMode};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SearchMovie(String),
    SearchTv(String),
    RequestMovie(String),
    RequestTv(String, SeasonMode),
    UpdateRequest(String, String),
    RequestCounts,
    IssueCounts,
}

#[derive(Default)]
pub struct FakeService {
    pub movies: Vec<MediaSearchResult>,
    pub shows: Vec<MediaSearchResult>,
    pub fail_movie_search: bool,
    pub fail_tv_search: bool,
    pub fail_writes: bool,
    pub counts: RequestCounts,
    pub issues: IssueCounts,
    pub(crate) calls: Mutex<Vec<Call>>,
}

pub fn hit(id: u64, popularity: Option<f64>) -> MediaSearchResult {
    MediaSearchResult::new(id, popularity)
}

fn unavailable() -> ClientError {
    ClientError::Status {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl FakeService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::RequestMovie(_) | Call::RequestTv(..) | Call::UpdateRequest(..)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaRequestService for FakeService {
    fn service_name(&self) -> &str {
        "fake"
    }

    async fn search_movie(&self, query: &str) -> Result<SearchResults, ClientError> {
        self.record(Call::SearchMovie(query.to_string()));
        if self.fail_movie_search {
            return Err(unavailable());
        }
        Ok(SearchResults::from_results(self.movies.clone()))
    }

    async fn search_tv(&self, query: &str) -> Result<SearchResults, ClientError> {
        self.record(Call::SearchTv(query.to_string()));
        if self.fail_tv_search {
            return Err(unavailable());
        }
        Ok(SearchResults::from_results(self.shows.clone()))
    }

    async fn request_movie(&self, media_id: &str) -> Result<(), ClientError> {
        self.record(Call::RequestMovie(media_id.to_string()));
        if self.fail_writes {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn request_tv(&self, media_id: &str, seasons: SeasonMode) -> Result<(), ClientError> {
        self.record(Call::RequestTv(media_id.to_string(), seasons));
        if self.fail_writes {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn update_request(&self, request_id: &str, status: &str) -> Result<(), ClientError> {
        self.record(Call::UpdateRequest(request_id.to_string(), status.to_string()));
        if self.fail_writes {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn request_counts(&self) -> Result<RequestCounts, ClientError> {
        self.record(Call::RequestCounts);
        Ok(self.counts.clone())
    }

    async fn issue_counts(&self) -> Result<IssueCounts, ClientError> {
        self.record(Call::IssueCounts);
        Ok(self.issues.clone())
    }
}

/// Records every entity update; optionally fails for one entity id
#[derive(Default)]
pub struct RecordingUpdater {
    pub fail_for: Option<&'static str>,
    pub(crate) updates: Mutex<Vec<String>>,
}

impl RecordingUpdater {
    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl crate::EntityUpdater for RecordingUpdater {
    async fn update_entity(&self, entity_id: &str) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push(entity_id.to_string());
        if self.fail_for.map_or(false, |id| id == entity_id) {
            anyhow::bail!("entity {} unavailable", entity_id);
        }
        Ok(())
    }
}
