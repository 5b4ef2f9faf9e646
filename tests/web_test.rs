//! HTTP round trips through the migrator router

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use ratelimit_migrator::{router, AppState, MigrationRecord, MigratorError, RulePresenter, TeraPresenter};

fn app() -> axum::Router {
    let presenter = TeraPresenter::new().unwrap();
    router(AppState::new(Arc::new(presenter)).unwrap())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_get_form() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<textarea name="deprecated_rule""#));
    assert!(html.contains(r#"<form method="POST">"#));
}

#[tokio::test]
async fn test_post_converts_rule() {
    // threshold = local.thresholds.thirty_requests
    // url_pattern = "api.example.net/*"
    let body = "deprecated_rule=threshold+%3D+local.thresholds.thirty_requests%0Aurl_pattern+%3D+%22api.example.net%2F*%22";
    let response = app().oneshot(form_post(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<textarea id="convertedRule" readonly>"#));
    assert!(html.contains("requests_per_period = 30"));
    // Rendered rule is HTML-escaped inside the text box
    assert!(html.contains("&quot;cloudflare_ruleset&quot;"));
    assert!(html.contains("Copy to Clipboard"));
}

#[tokio::test]
async fn test_post_without_field_renders_defaults() {
    let response = app().oneshot(form_post("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("requests_per_period = [UNKNOWN]"));
    assert!(html.contains("No description found"));
}

struct FailingPresenter;

impl RulePresenter for FailingPresenter {
    fn render(&self, _records: &[MigrationRecord]) -> Result<String, MigratorError> {
        Err(MigratorError::Config("layout unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_render_failure_is_server_error() {
    let app = router(AppState::new(Arc::new(FailingPresenter)).unwrap());
    let response = app.oneshot(form_post("deprecated_rule=x")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("layout unavailable"));
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app()
        .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
