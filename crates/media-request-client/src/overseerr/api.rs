use chrono::NaiveDate;
use media_request_models::{IssueCounts, MediaType, RequestCounts, SearchResults, SeasonMode};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ClientError;

/// Body of `POST /request`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRequestBody {
    pub media_type: &'static str,
    pub media_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Seasons>,
}

/// Seasons of a TV request: explicit numbers, or the keyword `"all"`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Seasons {
    Numbers(Vec<u32>),
    Keyword(&'static str),
}

impl Seasons {
    pub fn all() -> Self {
        Seasons::Keyword("all")
    }
}

impl MediaRequestBody {
    pub fn movie(media_id: u64) -> Self {
        Self {
            media_type: MediaType::Movie.as_str(),
            media_id,
            seasons: None,
        }
    }

    pub fn tv(media_id: u64, seasons: Seasons) -> Self {
        Self {
            media_type: MediaType::Tv.as_str(),
            media_id,
            seasons: Some(seasons),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvSeason {
    pub season_number: u32,
    /// `YYYY-MM-DD`; null for announced seasons without a date
    #[serde(default)]
    pub air_date: Option<String>,
}

impl TvSeason {
    fn aired_by(&self, today: NaiveDate) -> bool {
        self.air_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .is_some_and(|date| date <= today)
    }
}

/// The part of `GET /tv/{id}` needed to pick seasons
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    #[serde(default)]
    pub seasons: Vec<TvSeason>,
}

/// Parse a media id as sent by callers ("42", " 42 ") into the numeric TMDB id
pub fn parse_media_id(media_id: &str) -> Result<u64, ClientError> {
    media_id
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidMediaId(media_id.to_string()))
}

/// Choose the seasons to request for `mode`.
///
/// Season 0 holds specials and is only considered when a show has nothing else.
/// "Latest" is the highest season that has aired by `today`; announced seasons
/// are only picked when nothing has aired yet.
pub fn select_seasons(mode: SeasonMode, details: &TvDetails, today: NaiveDate) -> Result<Seasons, ClientError> {
    let regular: Vec<&TvSeason> = details.seasons.iter().filter(|s| s.season_number > 0).collect();
    let candidates: Vec<&TvSeason> = if regular.is_empty() {
        details.seasons.iter().collect()
    } else {
        regular
    };

    let chosen = match mode {
        SeasonMode::All => return Ok(Seasons::all()),
        SeasonMode::First => candidates.iter().map(|s| s.season_number).min(),
        SeasonMode::Latest => candidates
            .iter()
            .filter(|s| s.aired_by(today))
            .map(|s| s.season_number)
            .max()
            .or_else(|| candidates.iter().map(|s| s.season_number).max()),
    };

    chosen
        .map(|n| Seasons::Numbers(vec![n]))
        .ok_or(ClientError::NoSeasons(details.id))
}

/// Keep only hits of one media type; the search endpoint mixes movies, shows and people
///
/// Totals are recounted for the kept hits; the page count of the mixed search no
/// longer applies and is dropped.
pub fn retain_media_type(mut results: SearchResults, media_type: MediaType) -> SearchResults {
    results.results.retain(|r| r.media_type() == Some(media_type));
    results.total_results = Some(results.results.len() as u32);
    results.total_pages = None;
    results
}

async fn check_status(response: Response, action: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(action = action, status = status.as_u16(), body = %body, "Overseerr rejected call");
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// `GET /search?query=..&page=..`
pub async fn search(client: &Client, api_url: &str, query: &str, page: u32) -> Result<SearchResults, ClientError> {
    // Overseerr rejects '+' for spaces, so encode with %20
    let url = format!(
        "{}/search?query={}&page={}",
        api_url,
        urlencoding::encode(query),
        page
    );
    debug!(url = %url, "Searching Overseerr");

    let response = client.get(&url).send().await?;
    let response = check_status(response, "search").await?;
    let results: SearchResults = read_json(response).await?;

    debug!(query = query, hits = results.results.len(), "Search complete");
    Ok(results)
}

/// `GET /tv/{id}`
pub async fn get_tv_details(client: &Client, api_url: &str, tv_id: u64) -> Result<TvDetails, ClientError> {
    let url = format!("{}/tv/{}", api_url, tv_id);
    let response = client.get(&url).send().await?;
    let response = check_status(response, "tv_details").await?;
    read_json(response).await
}

/// `POST /request`
pub async fn create_request(client: &Client, api_url: &str, body: &MediaRequestBody) -> Result<(), ClientError> {
    let url = format!("{}/request", api_url);
    debug!(
        media_type = body.media_type,
        media_id = body.media_id,
        seasons = ?body.seasons,
        "Submitting request"
    );

    let response = client.post(&url).json(body).send().await?;
    check_status(response, "create_request").await?;
    Ok(())
}

/// `POST /request/{id}/{status}`
pub async fn update_request_status(
    client: &Client,
    api_url: &str,
    request_id: &str,
    status: &str,
) -> Result<(), ClientError> {
    let url = format!(
        "{}/request/{}/{}",
        api_url,
        urlencoding::encode(request_id),
        urlencoding::encode(status)
    );
    debug!(request_id = request_id, status = status, "Updating request status");

    let response = client.post(&url).send().await?;
    check_status(response, "update_request").await?;
    Ok(())
}

/// `GET /request/count`
pub async fn get_request_counts(client: &Client, api_url: &str) -> Result<RequestCounts, ClientError> {
    let url = format!("{}/request/count", api_url);
    let response = client.get(&url).send().await?;
    let response = check_status(response, "request_count").await?;
    read_json(response).await
}

/// `GET /issue/count`
pub async fn get_issue_counts(client: &Client, api_url: &str) -> Result<IssueCounts, ClientError> {
    let url = format!("{}/issue/count", api_url);
    let response = client.get(&url).send().await?;
    let response = check_status(response, "issue_count").await?;
    read_json(response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_request_models::MediaSearchResult;
    use serde_json::json;

    fn details(seasons: &[u32]) -> TvDetails {
        TvDetails {
            id: 1399,
            seasons: seasons
                .iter()
                .map(|n| TvSeason {
                    season_number: *n,
                    air_date: None,
                })
                .collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_movie_request_body() {
        let body = serde_json::to_value(MediaRequestBody::movie(42)).unwrap();
        assert_eq!(body, json!({"mediaType": "movie", "mediaId": 42}));
    }

    #[test]
    fn test_tv_request_body() {
        let all = serde_json::to_value(MediaRequestBody::tv(7, Seasons::all())).unwrap();
        assert_eq!(all, json!({"mediaType": "tv", "mediaId": 7, "seasons": "all"}));

        let first = serde_json::to_value(MediaRequestBody::tv(7, Seasons::Numbers(vec![1]))).unwrap();
        assert_eq!(first, json!({"mediaType": "tv", "mediaId": 7, "seasons": [1]}));
    }

    #[test]
    fn test_parse_media_id() {
        assert_eq!(parse_media_id("42").unwrap(), 42);
        assert_eq!(parse_media_id(" 42 ").unwrap(), 42);
        assert!(matches!(parse_media_id("tt0111161"), Err(ClientError::InvalidMediaId(_))));
    }

    #[test]
    fn test_select_seasons_skips_specials() {
        let show = details(&[0, 1, 2, 3]);
        assert_eq!(select_seasons(SeasonMode::First, &show, today()).unwrap(), Seasons::Numbers(vec![1]));
        assert_eq!(select_seasons(SeasonMode::Latest, &show, today()).unwrap(), Seasons::Numbers(vec![3]));
        assert_eq!(select_seasons(SeasonMode::All, &show, today()).unwrap(), Seasons::all());
    }

    #[test]
    fn test_latest_season_skips_unaired_seasons() {
        let show: TvDetails = serde_json::from_value(json!({
            "id": 1399,
            "seasons": [
                {"seasonNumber": 0, "airDate": "2018-12-01"},
                {"seasonNumber": 1, "airDate": "2019-04-14"},
                {"seasonNumber": 2, "airDate": "2021-05-02"},
                {"seasonNumber": 3, "airDate": null},
                {"seasonNumber": 4, "airDate": "2025-01-10"}
            ]
        }))
        .unwrap();

        assert_eq!(
            select_seasons(SeasonMode::Latest, &show, today()).unwrap(),
            Seasons::Numbers(vec![2])
        );
        assert_eq!(
            select_seasons(SeasonMode::First, &show, today()).unwrap(),
            Seasons::Numbers(vec![1])
        );
    }

    #[test]
    fn test_latest_season_on_air_date_counts_as_aired() {
        let show: TvDetails = serde_json::from_value(json!({
            "id": 7,
            "seasons": [
                {"seasonNumber": 1, "airDate": "2020-01-01"},
                {"seasonNumber": 2, "airDate": "2024-06-01"}
            ]
        }))
        .unwrap();

        assert_eq!(
            select_seasons(SeasonMode::Latest, &show, today()).unwrap(),
            Seasons::Numbers(vec![2])
        );
    }

    #[test]
    fn test_latest_season_falls_back_when_nothing_aired() {
        let show: TvDetails = serde_json::from_value(json!({
            "id": 7,
            "seasons": [
                {"seasonNumber": 1, "airDate": "2030-01-01"},
                {"seasonNumber": 2}
            ]
        }))
        .unwrap();

        assert_eq!(
            select_seasons(SeasonMode::Latest, &show, today()).unwrap(),
            Seasons::Numbers(vec![2])
        );
    }

    #[test]
    fn test_select_seasons_only_specials() {
        let show = details(&[0]);
        assert_eq!(select_seasons(SeasonMode::Latest, &show, today()).unwrap(), Seasons::Numbers(vec![0]));
    }

    #[test]
    fn test_select_seasons_without_seasons() {
        let show = details(&[]);
        assert!(matches!(
            select_seasons(SeasonMode::First, &show, today()),
            Err(ClientError::NoSeasons(1399))
        ));
        // "all" does not need the season list
        assert_eq!(select_seasons(SeasonMode::All, &show, today()).unwrap(), Seasons::all());
    }

    #[test]
    fn test_retain_media_type() {
        let results: SearchResults = serde_json::from_value(json!({
            "page": 1,
            "totalPages": 4,
            "totalResults": 73,
            "results": [
                {"id": 1, "mediaType": "movie", "title": "Dune"},
                {"id": 2, "mediaType": "tv", "name": "Dune: Prophecy"},
                {"id": 3, "mediaType": "person", "name": "Denis Villeneuve"}
            ]
        }))
        .unwrap();

        let movies = retain_media_type(results.clone(), MediaType::Movie);
        let ids: Vec<u64> = movies.results.iter().map(|r: &MediaSearchResult| r.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(movies.page, Some(1));
        assert_eq!(movies.total_results, Some(1));
        assert_eq!(movies.total_pages, None);

        let shows = retain_media_type(results, MediaType::Tv);
        assert_eq!(shows.results.len(), 1);
        assert_eq!(shows.results[0].id, 2);
    }
}
