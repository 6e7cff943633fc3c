//! HTTP surface: named actions, sensor states and the inbound webhook.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use media_request_core::{ActionError, ActionRegistry, RequestSensors, WebhookHandler, WebhookOutcome};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

pub struct AppState {
    pub actions: ActionRegistry,
    pub sensors: Arc<RequestSensors>,
    pub webhook: WebhookHandler,
    pub webhook_id: String,
}

pub type SharedAppState = Arc<AppState>;

pub fn router(state: SharedAppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/services/{action}", post(invoke_action))
        .route("/api/sensors", get(list_sensors))
        .route("/api/webhook/{webhook_id}", post(receive_webhook))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Read parameters leniently: an empty body means "no parameters"
fn parse_params(body: &[u8]) -> Result<Value, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(HttpError::InvalidBody)
}

async fn invoke_action(
    State(state): State<SharedAppState>,
    Path(action): Path<String>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let params = parse_params(&body)?;
    info!(operation = "service_call", action = %action, "Service call received");

    match state.actions.invoke(&action, params).await? {
        Some(payload) => Ok((StatusCode::OK, Json(payload)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn list_sensors(State(state): State<SharedAppState>) -> impl IntoResponse {
    Json(state.sensors.snapshot().await)
}

async fn receive_webhook(
    State(state): State<SharedAppState>,
    Path(webhook_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, HttpError> {
    if webhook_id != state.webhook_id {
        return Err(HttpError::UnknownWebhook);
    }

    match state.webhook.handle(&body).await {
        WebhookOutcome::Ignored => debug!("Webhook body ignored"),
        WebhookOutcome::Refreshed(report) => {
            info!(
                operation = "webhook_refresh",
                updated = report.updated,
                failed = report.failed,
                "Sensors refreshed from webhook"
            );
        }
    }
    Ok(StatusCode::OK)
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(serde_json::Error),
    #[error("unknown webhook")]
    UnknownWebhook,
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            HttpError::UnknownWebhook => StatusCode::NOT_FOUND,
            HttpError::Action(ActionError::UnknownAction(_)) => StatusCode::NOT_FOUND,
            HttpError::Action(ActionError::InvalidParams { .. }) => StatusCode::BAD_REQUEST,
            HttpError::Action(ActionError::Remote(_)) => StatusCode::BAD_GATEWAY,
            HttpError::Action(ActionError::Encode { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Service call failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use media_request_client::{ClientError, MediaRequestService};
    use media_request_core::{EntityUpdater, SensorRefreshTrigger};
    use media_request_models::{IssueCounts, MediaSearchResult, RequestCounts, SearchResults, SeasonMode};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubService {
        requested: Mutex<Vec<String>>,
        offline: bool,
    }

    impl StubService {
        fn check(&self) -> Result<(), ClientError> {
            if self.offline {
                return Err(ClientError::Status {
                    status: 500,
                    body: "down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MediaRequestService for StubService {
        fn service_name(&self) -> &str {
            "stub"
        }

        async fn search_movie(&self, _query: &str) -> Result<SearchResults, ClientError> {
            self.check()?;
            Ok(SearchResults::from_results(vec![MediaSearchResult::new(1, Some(5.0))]))
        }

        async fn search_tv(&self, _query: &str) -> Result<SearchResults, ClientError> {
            self.check()?;
            Ok(SearchResults::from_results(vec![MediaSearchResult::new(2, Some(9.0))]))
        }

        async fn request_movie(&self, media_id: &str) -> Result<(), ClientError> {
            self.check()?;
            self.requested.lock().unwrap().push(format!("movie:{}", media_id));
            Ok(())
        }

        async fn request_tv(&self, media_id: &str, seasons: SeasonMode) -> Result<(), ClientError> {
            self.check()?;
            self.requested.lock().unwrap().push(format!("tv:{}:{}", media_id, seasons));
            Ok(())
        }

        async fn update_request(&self, _request_id: &str, _status: &str) -> Result<(), ClientError> {
            self.check()
        }

        async fn request_counts(&self) -> Result<RequestCounts, ClientError> {
            Ok(RequestCounts::default())
        }

        async fn issue_counts(&self) -> Result<IssueCounts, ClientError> {
            Ok(IssueCounts::default())
        }
    }

    #[derive(Default)]
    struct CountingUpdater {
        updates: Mutex<usize>,
    }

    #[async_trait]
    impl EntityUpdater for CountingUpdater {
        async fn update_entity(&self, _entity_id: &str) -> anyhow::Result<()> {
            *self.updates.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn app(service: Arc<StubService>, updater: Arc<CountingUpdater>) -> Router {
        router(Arc::new(AppState {
            actions: ActionRegistry::new(service.clone()),
            sensors: Arc::new(RequestSensors::new(service)),
            webhook: WebhookHandler::new(SensorRefreshTrigger::new(updater)),
            webhook_id: "abc123".to_string(),
        }))
    }

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app(Arc::default(), Arc::default());
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_webhook_with_bad_body_is_accepted_without_refresh() {
        let updater = Arc::new(CountingUpdater::default());
        let app = app(Arc::default(), updater.clone());

        let response = app.oneshot(post("/api/webhook/abc123", "not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*updater.updates.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_webhook_with_json_refreshes_four_sensors() {
        let updater = Arc::new(CountingUpdater::default());
        let app = app(Arc::default(), updater.clone());

        let response = app.oneshot(post("/api/webhook/abc123", "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*updater.updates.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_unknown_webhook_id_is_not_found() {
        let updater = Arc::new(CountingUpdater::default());
        let app = app(Arc::default(), updater.clone());

        let response = app.oneshot(post("/api/webhook/nope", "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(*updater.updates.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_action_returns_merged_results() {
        let app = app(Arc::default(), Arc::default());
        let response = app
            .oneshot(post("/api/services/search", r#"{"name": "dune"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"results": [{"id": 2, "popularity": 9.0}, {"id": 1, "popularity": 5.0}]})
        );
    }

    #[tokio::test]
    async fn test_write_action_returns_no_content() {
        let service = Arc::new(StubService::default());
        let app = app(service.clone(), Arc::default());
        let response = app
            .oneshot(post("/api/services/submit_tv_request", r#"{"media_id": "7", "season": "first"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(*service.requested.lock().unwrap(), vec!["tv:7:first".to_string()]);
    }

    #[tokio::test]
    async fn test_action_errors_map_to_status_codes() {
        let app = app(Arc::default(), Arc::default());
        let response = app
            .clone()
            .oneshot(post("/api/services/launch_rocket", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(post("/api/services/update_request", r#"{"request_id": "1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post("/api/services/search_movies", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remote_failure_is_bad_gateway() {
        let service = Arc::new(StubService {
            offline: true,
            ..StubService::default()
        });
        let app = app(service, Arc::default());
        let response = app
            .oneshot(post("/api/services/submit_movie_request", r#"{"media_id": "42"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_sensors_endpoint_lists_all_sensors() {
        let app = app(Arc::default(), Arc::default());
        let request = Request::builder().uri("/api/sensors").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(5));
    }
}
