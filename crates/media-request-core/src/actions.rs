//! Named actions with JSON parameters.
//!
//! This is the calling convention exposed to the outside world (HTTP, CLI):
//! an action name plus a parameter object, validated here before anything
//! reaches the request service.

use media_request_client::{ClientError, MediaRequestService};
use media_request_models::SeasonMode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::dispatch::RequestDispatcher;
use crate::search::SearchAggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    SubmitMovieRequest,
    SubmitTvRequest,
    UpdateRequest,
    SearchMovies,
    SearchTv,
    Search,
}

impl ActionName {
    pub const ALL: [ActionName; 6] = [
        ActionName::SubmitMovieRequest,
        ActionName::SubmitTvRequest,
        ActionName::UpdateRequest,
        ActionName::SearchMovies,
        ActionName::SearchTv,
        ActionName::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::SubmitMovieRequest => "submit_movie_request",
            ActionName::SubmitTvRequest => "submit_tv_request",
            ActionName::UpdateRequest => "update_request",
            ActionName::SearchMovies => "search_movies",
            ActionName::SearchTv => "search_tv",
            ActionName::Search => "search",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Invalid parameters for {action}: {source}")]
    InvalidParams {
        action: ActionName,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode response of {action}: {source}")]
    Encode {
        action: ActionName,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Remote(#[from] ClientError),
}

// Numbers are accepted wherever a string is expected ("media_id": 42)
fn coerce_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, got {}", other)),
    }
}

fn string_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    coerce_string(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn optional_string_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_string(value).map(Some).map_err(serde::de::Error::custom),
    }
}

fn default_season() -> String {
    SeasonMode::default().as_str().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MovieRequestParams {
    #[serde(default, deserialize_with = "optional_string_like")]
    name: Option<String>,
    #[serde(default, deserialize_with = "optional_string_like")]
    media_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TvRequestParams {
    #[serde(default, deserialize_with = "optional_string_like")]
    name: Option<String>,
    #[serde(default, deserialize_with = "optional_string_like")]
    media_id: Option<String>,
    #[serde(default = "default_season", deserialize_with = "string_like")]
    season: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateRequestParams {
    #[serde(deserialize_with = "string_like")]
    request_id: String,
    #[serde(deserialize_with = "string_like")]
    new_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchParams {
    #[serde(deserialize_with = "string_like")]
    name: String,
}

fn parse_params<T: for<'de> Deserialize<'de>>(action: ActionName, params: Value) -> Result<T, ActionError> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|source| ActionError::InvalidParams { action, source })
}

/// The set of actions, bound to one request service
#[derive(Clone)]
pub struct ActionRegistry {
    dispatcher: RequestDispatcher,
    search: SearchAggregator,
}

impl ActionRegistry {
    pub fn new(service: Arc<dyn MediaRequestService>) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(service.clone()),
            search: SearchAggregator::new(service),
        }
    }

    /// Run an action by name. Search actions return their payload.
    pub async fn invoke(&self, action: &str, params: Value) -> Result<Option<Value>, ActionError> {
        let action = ActionName::parse(action).ok_or_else(|| ActionError::UnknownAction(action.to_string()))?;
        debug!(action = %action, "Invoking action");

        match action {
            ActionName::SubmitMovieRequest => {
                let p: MovieRequestParams = parse_params(action, params)?;
                self.dispatcher
                    .submit_movie_request(p.name.as_deref(), p.media_id.as_deref())
                    .await?;
                Ok(None)
            }
            ActionName::SubmitTvRequest => {
                let p: TvRequestParams = parse_params(action, params)?;
                self.dispatcher
                    .submit_tv_request(p.name.as_deref(), p.media_id.as_deref(), &p.season)
                    .await?;
                Ok(None)
            }
            ActionName::UpdateRequest => {
                let p: UpdateRequestParams = parse_params(action, params)?;
                self.dispatcher.update_request(&p.request_id, &p.new_status).await?;
                Ok(None)
            }
            ActionName::SearchMovies => {
                let p: SearchParams = parse_params(action, params)?;
                let results = self.search.search_movies(&p.name).await?;
                encode(action, &results).map(Some)
            }
            ActionName::SearchTv => {
                let p: SearchParams = parse_params(action, params)?;
                let results = self.search.search_tv(&p.name).await?;
                encode(action, &results).map(Some)
            }
            ActionName::Search => {
                let p: SearchParams = parse_params(action, params)?;
                let results = self.search.search_all(&p.name).await;
                encode(action, &results).map(Some)
            }
        }
    }
}

fn encode<T: serde::Serialize>(action: ActionName, value: &T) -> Result<Value, ActionError> {
    serde_json::to_value(value).map_err(|source| ActionError::Encode { action, source })
}
