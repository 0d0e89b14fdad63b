#![allow(dead_code)]

use axum::{Router, extract::connect_info::MockConnectInfo};
use serde_json::json;
use std::net::SocketAddr;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use dossier::{
    agent::Agent, app_state::AppState, config::Config, db, repositories::ReportRepository, web,
    web::rate_limit::RateLimit,
};

pub const GOOD_ARTICLE: &str = r#"<!doctype html>
<html><head><title>Cold climate heat pump trial</title></head>
<body>
<nav><a href="/">Home</a> <a href="/about">About</a></nav>
<article>
<h1>Cold climate heat pump trial</h1>
<p>Field trials across three winters found that modern air-source heat pumps kept a
seasonal coefficient of performance above two even when outdoor temperatures dropped
to minus fifteen degrees Celsius.</p>
<p>Households that paired the units with better insulation saw the largest savings,
while homes with undersized radiators relied more often on backup resistance heating.</p>
<p>The researchers caution that installation quality varied widely and that defrost
cycles reduced efficiency during humid cold spells.</p>
</article>
<footer>Copyright 2024</footer>
</body></html>"#;

pub async fn test_repo() -> ReportRepository {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    ReportRepository::new(pool)
}

/// Config whose providers all point at `server`.
pub fn test_config(server: &MockServer) -> Config {
    Config::default()
        .with_database_url("sqlite::memory:")
        .with_tavily(
            Some("tvly-test".to_string()),
            format!("{}/search", server.uri()),
        )
        .with_openai(Some("sk-test".to_string()), server.uri())
        .with_session_secret("test-secret")
}

pub fn test_agent(config: &Config, repo: ReportRepository) -> Agent {
    Agent::from_config(config, repo).expect("Failed to build agent")
}

pub async fn mount_search(server: &MockServer, results: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

pub async fn mount_page(server: &MockServer, page: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(template)
        .mount(server)
        .await;
}

pub fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.as_bytes().to_vec())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

pub async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })))
        .mount(server)
        .await;
}

/// A blocked page plus a readable article, in that order.
pub async fn mount_two_sources(server: &MockServer) {
    mount_search(
        server,
        json!([
            {"title": "Paywalled review", "url": format!("{}/pages/blocked", server.uri()), "content": "..."},
            {"title": "Cold climate trial", "url": format!("{}/pages/good", server.uri()), "content": "..."}
        ]),
    )
    .await;
    mount_page(server, "/pages/blocked", ResponseTemplate::new(403)).await;
    mount_page(server, "/pages/good", html_page(GOOD_ARTICLE)).await;
}

pub const REPORT_MARKDOWN: &str = "# Heat pumps in cold climates\n\n\
**Query:** heat pumps\n\n\
## Key Findings\n- COP stays above two at -15C [S2].\n\n\
## Where Sources Agree\n- Insulation matters [S2].\n\n\
## Caveats & Gaps\n- One source was unavailable [S1].\n\n\
## Sources\n- Paywalled review\n- Cold climate trial\n";

pub fn test_app(state: AppState) -> Router {
    with_client_addr(web::router(state))
}

pub fn test_app_with_rate_limit(state: AppState, rate_limit: RateLimit) -> Router {
    with_client_addr(web::router_with_rate_limit(state, rate_limit))
}

fn with_client_addr(router: Router) -> Router {
    router.layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}
