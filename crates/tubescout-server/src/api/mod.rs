mod placements;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use tubescout_core::AppConfig;
use tubescout_gemini::GeminiClient;
use tubescout_youtube::YouTubeClient;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub youtube: YouTubeClient,
    pub gemini: Option<GeminiClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "too_niche" => StatusCode::UNPROCESSABLE_ENTITY,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/v1/placements", post(placements::find_placements))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use tubescout_core::Environment;

    fn test_config(deadline_secs: u64) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "warn".to_owned(),
            youtube_api_key: "yt-test-key".to_owned(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_owned(),
            http_user_agent: "tubescout-test/0.1".to_owned(),
            request_timeout_secs: 5,
            request_deadline_secs: deadline_secs,
            max_retries: 0,
            retry_backoff_base_ms: 1,
        }
    }

    fn test_state(youtube_base_url: &str, deadline_secs: u64) -> AppState {
        let youtube =
            YouTubeClient::with_base_url("yt-test-key", 5, "tubescout-test/0.1", youtube_base_url)
                .expect("youtube client")
                .with_retry_policy(0, 1);
        AppState {
            config: Arc::new(test_config(deadline_secs)),
            youtube,
            gemini: None,
        }
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_returns_ok_with_request_id_header() {
        let app = build_app(test_state("http://127.0.0.1:1", 60));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn request_id_header_is_echoed_back() {
        let app = build_app(test_state("http://127.0.0.1:1", 60));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .header("x-request-id", "req-echo-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().ok()),
            Some(Some("req-echo-1"))
        );
    }

    #[tokio::test]
    async fn placements_rejects_empty_request() {
        let app = build_app(test_state("http://127.0.0.1:1", 60));
        let response = app
            .oneshot(json_request("/api/v1/placements", serde_json::json!({})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("bad_request"));
    }

    #[tokio::test]
    async fn placements_rejects_both_channel_id_and_profile() {
        let app = build_app(test_state("http://127.0.0.1:1", 60));
        let body = serde_json::json!({
            "channelId": "UCsrc",
            "profile": { "name": "HolidayBeats" }
        });
        let response = app
            .oneshot(json_request("/api/v1/placements", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn placements_with_unreachable_search_backend_is_not_found() {
        // Every query against the mock server 404s, so aggregation ends
        // with zero candidates and the terminal not_found error surfaces.
        let server = wiremock::MockServer::start().await;
        let app = build_app(test_state(&server.uri(), 60));
        let body = serde_json::json!({
            "profile": {
                "name": "HolidayBeats",
                "videoTitles": ["Jingle Bell Rock Cover"],
                "tags": ["christmas", "rock"]
            }
        });
        let response = app
            .oneshot(json_request("/api/v1/placements", body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
    }

    #[tokio::test]
    async fn placements_deadline_expiry_maps_to_timeout() {
        let server = wiremock::MockServer::start().await;
        let app = build_app(test_state(&server.uri(), 0));
        let body = serde_json::json!({
            "profile": { "name": "HolidayBeats", "tags": ["christmas"] }
        });
        let response = app
            .oneshot(json_request("/api/v1/placements", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn api_error_too_niche_maps_to_unprocessable_entity() {
        let response = ApiError::new("req-1", "too_niche", "channel may be too niche").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
