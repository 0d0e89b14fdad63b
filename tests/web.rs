mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use dossier::app_state::AppState;
use dossier::web::rate_limit::RateLimit;
use helpers::*;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

async fn state_for(server: &MockServer) -> AppState {
    let config = test_config(server);
    AppState::from_config(&config, test_repo().await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_query(query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/run")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("query={query}")))
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of the response's `Set-Cookie`.
fn flash_cookie(response: &Response) -> String {
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_healthz() {
    let server = MockServer::start().await;
    let app = test_app(state_for(&server).await);

    let response = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_blank_query_is_rejected_with_flash() {
    let server = MockServer::start().await;
    let app = test_app(state_for(&server).await);

    let response = app.clone().oneshot(post_query("+++")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    let cookie = flash_cookie(&response);

    let index = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    let cleared = index.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
    let html = body_string(index).await;
    assert!(html.contains(r#"class="flash error""#));
    assert!(html.contains("No reports yet."));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_run_then_view_report() {
    let server = MockServer::start().await;
    mount_two_sources(&server).await;
    mount_completion(&server, REPORT_MARKDOWN).await;
    let app = test_app(state_for(&server).await);

    let response = app
        .clone()
        .oneshot(post_query("heat+pumps"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(location, "/report/1");
    let cookie = flash_cookie(&response);

    let page = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(location.as_str())
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = body_string(page).await;
    assert!(html.contains(r#"class="flash success""#));
    assert!(html.contains(r#"<h2 id="key-findings">"#));
    assert!(html.contains(r##"href="#S2""##));
    assert!(html.contains(r#"<li id="S1">"#));
    assert!(html.contains(r#"<li id="S2">"#));
    assert!(html.contains("status-blocked"));
    assert!(!html.contains(r#"class="banner""#));

    let index = body_string(app.oneshot(get("/")).await.unwrap()).await;
    assert!(index.contains(r#"href="/report/1""#));
}

#[tokio::test]
async fn test_search_failure_flashes_error_and_shows_banner() {
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;
    let app = test_app(state_for(&server).await);

    let response = app.clone().oneshot(post_query("nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let html = body_string(app.oneshot(get(&location)).await.unwrap()).await;
    assert!(html.contains(r#"class="banner""#));
    assert!(html.contains("No results found."));
}

#[tokio::test]
async fn test_unknown_report_redirects_home() {
    let server = MockServer::start().await;
    let app = test_app(state_for(&server).await);

    let response = app.oneshot(get("/report/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    assert!(flash_cookie(&response).starts_with("flash="));
}

#[tokio::test]
async fn test_json_api() {
    let server = MockServer::start().await;
    mount_two_sources(&server).await;
    mount_completion(&server, REPORT_MARKDOWN).await;
    let app = test_app(state_for(&server).await);

    app.clone().oneshot(post_query("heat+pumps")).await.unwrap();

    let list: Value = serde_json::from_str(
        &body_string(app.clone().oneshot(get("/api/reports")).await.unwrap()).await,
    )
    .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["query"], "heat pumps");

    let detail: Value = serde_json::from_str(
        &body_string(app.clone().oneshot(get("/api/reports/1")).await.unwrap()).await,
    )
    .unwrap();
    assert_eq!(detail["id"], 1);
    assert_eq!(detail["sources"][0]["status"], "blocked");
    assert_eq!(detail["sources"][1]["status"], "ok");

    let missing = app.oneshot(get("/api/reports/999")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_string(missing).await).unwrap();
    assert_eq!(body["error"], "Report not found.");
}

#[tokio::test]
async fn test_openapi_document() {
    let server = MockServer::start().await;
    let app = test_app(state_for(&server).await);

    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(doc["paths"]["/api/reports"].is_object());
    assert!(doc["paths"]["/api/reports/{id}"].is_object());
    assert!(doc["paths"]["/healthz"].is_object());
}

#[tokio::test]
async fn test_run_is_rate_limited() {
    let server = MockServer::start().await;
    let app = test_app_with_rate_limit(state_for(&server).await, RateLimit::new(1, 60));

    let first = app.clone().oneshot(post_query("")).await.unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = app.clone().oneshot(post_query("")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // other routes are not limited
    let health = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
