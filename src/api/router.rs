use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::workflow_engine;
use crate::domain::DomainError;
use crate::infrastructure::observability::create_metrics_router;

const HEALTH_PATH: &str = "/health";
const LIVE_PATH: &str = "/live";
const WORKFLOW_ENGINE_PREFIX: &str = "/workflow-engine";

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let metrics_router = state
        .metrics
        .clone()
        .map(|metrics| create_metrics_router(metrics, &state.metrics_path));

    let mut router = Router::new()
        .route(HEALTH_PATH, get(health::health_check))
        .route(LIVE_PATH, get(health::live_check))
        .nest(
            WORKFLOW_ENGINE_PREFIX,
            workflow_engine::create_workflow_engine_router(),
        )
        .with_state(state);

    if let Some(metrics_router) = metrics_router {
        router = router.merge(metrics_router);
    }

    router
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Check that the scrape endpoint can be merged into [`create_router`].
///
/// The path must be absolute, free of route parameters, and must not collide
/// with the application routes.
pub fn validate_metrics_path(path: &str) -> Result<(), DomainError> {
    if !path.starts_with('/') {
        return Err(DomainError::configuration(format!(
            "metrics path '{}' must start with '/'",
            path
        )));
    }

    if path.contains(['{', '}', '*', ':']) {
        return Err(DomainError::configuration(format!(
            "metrics path '{}' must be a literal path",
            path
        )));
    }

    let under_engine = path == WORKFLOW_ENGINE_PREFIX
        || path
            .strip_prefix(WORKFLOW_ENGINE_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'));

    if path == HEALTH_PATH || path == LIVE_PATH || under_engine {
        return Err(DomainError::configuration(format!(
            "metrics path '{}' conflicts with an application route",
            path
        )));
    }

    Ok(())
}

/// Any origin, for browser clients
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::llm::MockCompletionClient;
    use crate::domain::CompletionError;
    use crate::infrastructure::observability::PrometheusMetrics;
    use crate::infrastructure::services::ExecutionService;

    fn app_with(client: MockCompletionClient) -> Router {
        create_router(AppState::new(ExecutionService::from_client(Some(Arc::new(
            client,
        )))))
    }

    fn never_called() -> MockCompletionClient {
        let mut client = MockCompletionClient::new();
        client.expect_complete().never();
        client
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/workflow-engine/execute")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chain_request() -> Value {
        json!({
            "workflow": {
                "id": "chain",
                "steps": [
                    {"id": "s1", "type": "prompt", "template": "Summarize: {{input}}", "output_key": "summary"},
                    {"id": "s2", "type": "prompt", "template": "Improve: {{summary}}", "output_key": "improvements"}
                ]
            },
            "inputs": {"input": "raw text"}
        })
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|prompt, _| prompt == "Summarize: raw text")
            .times(1)
            .returning(|_, _| Ok("a summary".to_string()));
        client
            .expect_complete()
            .withf(|prompt, _| prompt == "Improve: a summary")
            .times(1)
            .returning(|_, _| Ok("a better summary".to_string()));

        let response = app_with(client)
            .oneshot(post_json(chain_request().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["workflow_id"], "chain");
        assert_eq!(
            body["outputs"],
            json!({"summary": "a summary", "improvements": "a better summary"})
        );
        assert_eq!(body["trace"].as_array().unwrap().len(), 2);
        assert_eq!(body["trace"][1]["status"], "success");
        assert!(body["total_latency_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_step_failure_is_200() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|prompt, _| prompt.starts_with("Summarize"))
            .returning(|_, _| Ok("a summary".to_string()));
        client
            .expect_complete()
            .withf(|prompt, _| prompt.starts_with("Improve"))
            .returning(|_, _| Err(CompletionError::status("Anthropic", 429, "rate limited")));

        let response = app_with(client)
            .oneshot(post_json(chain_request().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["outputs"], json!({"summary": "a summary"}));
        assert_eq!(body["trace"][1]["step_id"], "s2");
        assert_eq!(body["trace"][1]["status"], "failed");
        assert_eq!(
            body["trace"][1]["error"],
            "Anthropic API error: 429 - rate limited"
        );
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let cases = [
            (
                json!({"workflow": {"id": "w", "steps": []}, "inputs": {}}),
                "workflow.id and non-empty workflow.steps are required",
            ),
            (
                json!({"workflow": {"id": "", "steps": [{"id": "s", "type": "prompt", "template": "t", "output_key": "o"}]}, "inputs": {}}),
                "workflow.id and non-empty workflow.steps are required",
            ),
            (
                json!({"workflow": {"id": "w", "steps": [{"id": "s", "type": "prompt", "template": "t", "output_key": "o"}]}, "inputs": "text"}),
                "inputs must be an object",
            ),
        ];

        for (request, message) in cases {
            let response = app_with(never_called())
                .oneshot(post_json(request.to_string()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({"error": message}));
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let response = app_with(never_called())
            .oneshot(post_json("{\"workflow\":"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Invalid JSON body"})
        );
    }

    #[tokio::test]
    async fn test_text_plain_body_is_accepted() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(2)
            .returning(|prompt, _| Ok(format!("re: {prompt}")));

        let request = Request::builder()
            .method("POST")
            .uri("/workflow-engine/execute")
            .header("content-type", "text/plain;charset=UTF-8")
            .body(Body::from(chain_request().to_string()))
            .unwrap();

        let response = app_with(client).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["outputs"]["summary"], "re: Summarize: raw text");
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let app = create_router(AppState::new(ExecutionService::unconfigured()));

        let response = app
            .clone()
            .oneshot(post_json(chain_request().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "ANTHROPIC_API_KEY not configured"})
        );

        // Checked before the body is parsed
        let response = app.oneshot(post_json("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_service_health() {
        let response = app_with(never_called())
            .oneshot(get("/workflow-engine/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "ok", "service": "workflow-engine"})
        );
    }

    #[tokio::test]
    async fn test_health_and_live_routes() {
        let app = create_router(AppState::new(ExecutionService::unconfigured()));

        let response = app.clone().oneshot(get("/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "req-7")
            .body(Body::empty())
            .unwrap();

        let response = app_with(never_called()).oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-7");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/workflow-engine/execute")
            .header("origin", "https://app.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app_with(never_called()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let methods = response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(ExecutionService::unconfigured())
            .with_metrics(PrometheusMetrics::from(handle), "/metrics");

        let response = create_router(state).oneshot(get("/metrics")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_when_disabled() {
        let response = app_with(never_called())
            .oneshot(get("/metrics"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validate_metrics_path() {
        assert!(validate_metrics_path("/metrics").is_ok());
        assert!(validate_metrics_path("/internal/metrics").is_ok());
        assert!(validate_metrics_path("/workflow-engine-metrics").is_ok());

        for path in [
            "metrics",
            "",
            "/health",
            "/live",
            "/workflow-engine",
            "/workflow-engine/execute",
            "/workflow-engine/stats",
            "/metrics/{id}",
        ] {
            let err = validate_metrics_path(path).unwrap_err();
            assert!(
                matches!(err, DomainError::Configuration { .. }),
                "{path}: {err:?}"
            );
        }
    }
}
