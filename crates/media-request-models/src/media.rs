use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of catalog entry returned by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            "person" => Some(MediaType::Person),
            _ => None,
        }
    }
}

/// A single search hit.
///
/// Only `id` and `popularity` are interpreted; every other field the remote
/// service sends is kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSearchResult {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaSearchResult {
    pub fn new(id: u64, popularity: Option<f64>) -> Self {
        Self {
            id,
            popularity,
            extra: Map::new(),
        }
    }

    /// Popularity used for ranking; absent scores rank as zero
    pub fn popularity_score(&self) -> f64 {
        self.popularity.unwrap_or(0.0)
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.extra
            .get("mediaType")
            .and_then(Value::as_str)
            .and_then(MediaType::parse)
    }

    /// Display title: movies carry `title`, shows carry `name`
    pub fn title(&self) -> Option<&str> {
        self.extra
            .get("title")
            .or_else(|| self.extra.get("name"))
            .and_then(Value::as_str)
    }

    /// Release year taken from `releaseDate` (movies) or `firstAirDate` (tv)
    pub fn year(&self) -> Option<&str> {
        self.extra
            .get("releaseDate")
            .or_else(|| self.extra.get("firstAirDate"))
            .and_then(Value::as_str)
            .and_then(|date| date.get(..4))
    }
}

/// Search response envelope.
///
/// `results` is empty when the remote omits it. Paging fields are only
/// written back out when they were present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub results: Vec<MediaSearchResult>,
}

impl SearchResults {
    pub fn from_results(results: Vec<MediaSearchResult>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn first(&self) -> Option<&MediaSearchResult> {
        self.results.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_result_keeps_vendor_fields() {
        let raw = json!({
            "id": 438631,
            "mediaType": "movie",
            "popularity": 112.5,
            "title": "Dune",
            "releaseDate": "2021-09-15"
        });

        let result: MediaSearchResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(result.id, 438631);
        assert_eq!(result.popularity, Some(112.5));
        assert_eq!(result.media_type(), Some(MediaType::Movie));
        assert_eq!(result.title(), Some("Dune"));
        assert_eq!(result.year(), Some("2021"));

        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn test_missing_popularity_scores_zero_and_is_not_emitted() {
        let result: MediaSearchResult = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(result.popularity, None);
        assert_eq!(result.popularity_score(), 0.0);
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"id": 3}));
    }

    #[test]
    fn test_tv_result_title_uses_name() {
        let result: MediaSearchResult = serde_json::from_value(json!({
            "id": 1399,
            "mediaType": "tv",
            "name": "Game of Thrones",
            "firstAirDate": "2011-04-17"
        }))
        .unwrap();
        assert_eq!(result.media_type(), Some(MediaType::Tv));
        assert_eq!(result.title(), Some("Game of Thrones"));
        assert_eq!(result.year(), Some("2011"));
    }

    #[test]
    fn test_search_results_without_results_field() {
        let results: SearchResults = serde_json::from_value(json!({"page": 1})).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.page, Some(1));
        assert_eq!(
            serde_json::to_value(SearchResults::default()).unwrap(),
            json!({"results": []})
        );
    }
}
