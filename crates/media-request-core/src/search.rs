use media_request_client::{ClientError, MediaRequestService};
use media_request_models::{MediaSearchResult, SearchResults};
use std::sync::Arc;
use tracing::{debug, error};

/// Movie, TV and combined catalog search
#[derive(Clone)]
pub struct SearchAggregator {
    service: Arc<dyn MediaRequestService>,
}

impl SearchAggregator {
    pub fn new(service: Arc<dyn MediaRequestService>) -> Self {
        Self { service }
    }

    pub async fn search_movies(&self, name: &str) -> Result<SearchResults, ClientError> {
        self.service.search_movie(name).await
    }

    pub async fn search_tv(&self, name: &str) -> Result<SearchResults, ClientError> {
        self.service.search_tv(name).await
    }

    /// Movies and shows in one list, most popular first.
    ///
    /// Never fails: a search error is logged and yields an empty result set.
    pub async fn search_all(&self, name: &str) -> SearchResults {
        match self.collect_all(name).await {
            Ok(results) => {
                debug!(query = name, hits = results.len(), "Unified search complete");
                SearchResults::from_results(results)
            }
            Err(e) => {
                error!("Error during unified search: {}", e);
                SearchResults::default()
            }
        }
    }

    async fn collect_all(&self, name: &str) -> Result<Vec<MediaSearchResult>, ClientError> {
        let movies = self.service.search_movie(name).await?.results;
        let shows = self.service.search_tv(name).await?.results;
        Ok(merge_by_popularity(movies, shows))
    }
}

/// Movies followed by shows, stable-sorted by popularity descending (missing = 0)
pub fn merge_by_popularity(
    movies: Vec<MediaSearchResult>,
    shows: Vec<MediaSearchResult>,
) -> Vec<MediaSearchResult> {
    let mut combined = movies;
    combined.extend(shows);
    combined.sort_by(|a, b| b.popularity_score().total_cmp(&a.popularity_score()));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, Call, FakeService};
    use serde_json::json;

    fn ids(results: &[MediaSearchResult]) -> Vec<u64> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_merge_orders_by_popularity_with_missing_as_zero() {
        let merged = merge_by_popularity(vec![hit(1, Some(5.0))], vec![hit(2, Some(9.0)), hit(3, None)]);
        assert_eq!(ids(&merged), vec![2, 1, 3]);
    }

    #[test]
    fn test_merge_is_stable_for_ties() {
        let merged = merge_by_popularity(
            vec![hit(1, Some(4.0)), hit(2, None)],
            vec![hit(3, Some(4.0)), hit(4, Some(0.0))],
        );
        // movies keep precedence over shows on equal scores
        assert_eq!(ids(&merged), vec![1, 3, 2, 4]);
    }

    #[tokio::test]
    async fn test_search_all_merges_both_catalogs() {
        let service = Arc::new(FakeService {
            movies: vec![hit(1, Some(5.0))],
            shows: vec![hit(2, Some(9.0)), hit(3, None)],
            ..FakeService::default()
        });
        let results = SearchAggregator::new(service.clone()).search_all("dune").await;

        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({"results": [
                {"id": 2, "popularity": 9.0},
                {"id": 1, "popularity": 5.0},
                {"id": 3}
            ]})
        );
        assert_eq!(
            service.calls(),
            vec![Call::SearchMovie("dune".to_string()), Call::SearchTv("dune".to_string())]
        );
    }

    #[tokio::test]
    async fn test_search_all_swallows_movie_failure() {
        let service = Arc::new(FakeService {
            fail_movie_search: true,
            shows: vec![hit(2, Some(9.0))],
            ..FakeService::default()
        });
        let results = SearchAggregator::new(service).search_all("dune").await;
        assert_eq!(results, SearchResults::default());
    }

    #[tokio::test]
    async fn test_search_all_swallows_tv_failure() {
        let service = Arc::new(FakeService {
            movies: vec![hit(1, Some(5.0))],
            fail_tv_search: true,
            ..FakeService::default()
        });
        let results = SearchAggregator::new(service).search_all("dune").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_single_catalog_search_propagates_errors() {
        let service = Arc::new(FakeService {
            fail_movie_search: true,
            ..FakeService::default()
        });
        let aggregator = SearchAggregator::new(service);
        assert!(aggregator.search_movies("dune").await.is_err());
        assert!(aggregator.search_tv("dune").await.is_ok());
    }
}
