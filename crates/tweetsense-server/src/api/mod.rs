mod analyze;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tweetsense_sentiment::{AnalysisError, InferenceContext, PostSource, Weighting};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<InferenceContext>,
    pub source: Arc<PostSource>,
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
    vocabulary_size: usize,
    weighting: Weighting,
    classes: Vec<i64>,
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
            "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Usage warnings become `validation_error`; everything else is `unavailable`
/// with the single user-facing message.
pub(super) fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    if error.is_usage_error() {
        return ApiError::new(request_id, "validation_error", error.to_string());
    }
    tracing::warn!(error = ?error, "analysis unavailable");
    ApiError::new(request_id, "unavailable", error.to_string())
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

fn analysis_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/analyze/text", post(analyze::analyze_text))
        .route(
            "/api/v1/analyze/users/{username}",
            get(analyze::analyze_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(analysis_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            vocabulary_size: state.context.vectorizer().n_features(),
            weighting: state.context.vectorizer().weighting(),
            classes: state.context.classifier().classes().to_vec(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use tweetsense_sentiment::{ArtifactPaths, BirdClient, NitterClient, UnavailableReason};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>jack / @jack</title>
    <item>
      <title>I love this, best day ever</title>
      <link>https://nitter.example/jack/status/1#m</link>
    </item>
    <item>
      <title>awful and boring, I hate it</title>
      <link>https://nitter.example/jack/status/2#m</link>
    </item>
  </channel>
</rss>"#;

    fn context() -> Arc<InferenceContext> {
        let artifacts = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts");
        let paths = ArtifactPaths {
            model: artifacts.join("model.json"),
            vectorizer: artifacts.join("vectorizer.json"),
            stopwords: None,
        };
        Arc::new(InferenceContext::load(&paths).expect("bundled artifacts load"))
    }

    fn offline_state() -> AppState {
        AppState {
            context: context(),
            source: Arc::new(PostSource::Bird(BirdClient::with_program(
                "tweetsense-test-no-such-binary",
                "token",
                "ct0",
                5,
            ))),
        }
    }

    fn nitter_state(base_url: &str) -> AppState {
        let client = NitterClient::new(&[base_url.to_string()], 5, 5, "tweetsense-test")
            .expect("client builds");
        AppState {
            context: context(),
            source: Arc::new(PostSource::Nitter(client)),
        }
    }

    fn app(state: AppState) -> Router {
        build_app(state, RateLimitState::new(100, Duration::from_secs(60)))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn text_request(text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/text")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "text": text }).to_string()))
            .expect("request")
    }

    #[test]
    fn api_error_codes_map_to_status() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("unavailable", StatusCode::SERVICE_UNAVAILABLE),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "{code}");
        }
    }

    #[test]
    fn analysis_errors_map_to_codes() {
        let err = map_analysis_error("req".to_string(), &AnalysisError::EmptyUsername);
        assert_eq!(err.error.code, "validation_error");
        assert_eq!(err.error.message, "Please enter a Twitter username.");

        let err = map_analysis_error(
            "req".to_string(),
            &AnalysisError::Unavailable(UnavailableReason::NoPosts),
        );
        assert_eq!(err.error.code, "unavailable");
    }

    #[tokio::test]
    async fn health_reports_model_shape() {
        let response = app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.as_bytes()),
            Some(&b"req-health"[..])
        );
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["vocabulary_size"], 16);
        assert_eq!(json["data"]["weighting"], "tfidf");
        assert_eq!(json["data"]["classes"], serde_json::json!([0, 1]));
        assert_eq!(json["meta"]["request_id"], "req-health");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let header = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("request id header");
        assert!(uuid::Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn analyze_text_returns_label() {
        let response = app(offline_state())
            .oneshot(text_request("I love this amazing movie!"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["label"], "Positive");
        assert_eq!(json["data"]["normalized"], "love amazing movie");
    }

    #[tokio::test]
    async fn analyze_text_negative() {
        let response = app(offline_state())
            .oneshot(text_request("The worst, most terrible service."))
            .await
            .expect("response");
        let json = body_json(response).await;
        assert_eq!(json["data"]["label"], "Negative");
    }

    #[tokio::test]
    async fn blank_text_is_a_validation_error() {
        let response = app(offline_state())
            .oneshot(text_request("   "))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "Please enter some text.");
    }

    #[tokio::test]
    async fn analyze_user_labels_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jack/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let response = app(nitter_state(&server.uri()))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze/users/@jack")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["username"], "jack");
        let posts = json["data"]["posts"].as_array().expect("posts array");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["label"], "Positive");
        assert_eq!(posts[0]["url"], "https://x.com/jack/status/1");
        assert_eq!(posts[1]["label"], "Negative");
    }

    #[tokio::test]
    async fn bare_at_sign_username_is_a_validation_error() {
        let response = app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze/users/%40")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Please enter a Twitter username.");
    }

    #[tokio::test]
    async fn fetch_failure_is_unavailable() {
        let response = app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze/users/jack")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unavailable");
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Twitter data could not be fetched")));
    }

    #[tokio::test]
    async fn rate_limit_rejects_excess_requests() {
        let app = build_app(
            offline_state(),
            RateLimitState::new(1, Duration::from_secs(60)),
        );

        let first = app
            .clone()
            .oneshot(text_request("good"))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(text_request("good")).await.expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(second).await;
        assert_eq!(json["error"]["code"], "rate_limited");
    }

    #[tokio::test]
    async fn health_is_not_rate_limited() {
        let app = build_app(
            offline_state(),
            RateLimitState::new(0, Duration::from_secs(60)),
        );
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
