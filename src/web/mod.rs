//! HTTP surface: HTML pages, the JSON API and the OpenAPI document.

pub mod flash;
pub mod handlers;
pub mod markdown;
pub mod pages;
pub mod rate_limit;

use axum::{
    Router,
    extract::Request,
    http::HeaderName,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::entities::{Report, Source, SourceStatus};
use crate::health::{self, HealthResponse};
use rate_limit::{RateLimit, rate_limit_middleware};

/// Runs allowed per client IP per window on `POST /run`.
pub const RUN_RATE_LIMIT: u32 = 10;
pub const RUN_RATE_WINDOW_SECONDS: i64 = 60;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        handlers::api_list_reports,
        handlers::api_get_report,
    ),
    components(schemas(
        HealthResponse,
        Report,
        Source,
        SourceStatus,
        handlers::ReportDetail,
        handlers::ErrorResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "reports", description = "Stored research reports")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    router_with_rate_limit(state, RateLimit::new(RUN_RATE_LIMIT, RUN_RATE_WINDOW_SECONDS))
}

/// The app with an explicit `/run` budget.
pub fn router_with_rate_limit(state: AppState, rate_limit: RateLimit) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let run = Router::new()
        .route("/run", post(handlers::run))
        .route_layer(middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/report/{id}", get(handlers::show_report))
        .route("/healthz", get(health::health_check))
        .route("/api/reports", get(handlers::api_list_reports))
        .route("/api/reports/{id}", get(handlers::api_get_report))
        .route("/api-docs/openapi.json", get(handlers::openapi))
        .merge(run)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let request_id = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}
