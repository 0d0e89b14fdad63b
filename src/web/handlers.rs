use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

use crate::agent::ReportKind;
use crate::app_state::AppState;
use crate::entities::{Report, Source};
use crate::web::{
    ApiDoc,
    flash::{self, Flash},
    markdown, pages,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct RunForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub sources: Vec<Source>,
}

/// Redirect to `to`, carrying `flash` for the next page render.
fn redirect_with_flash(state: &AppState, to: &str, flash: Flash) -> Response {
    match state.flash.set_cookie(&flash) {
        Ok(cookie) => (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(to)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to sign flash cookie");
            Redirect::to(to).into_response()
        }
    }
}

/// Render a page, consuming any pending flash.
fn page_with_flash(
    state: &AppState,
    headers: &HeaderMap,
    render: impl FnOnce(Option<&Flash>) -> String,
) -> Response {
    match state.flash.from_headers(headers) {
        Some(flash) => (
            AppendHeaders([(SET_COOKIE, flash::clear_cookie())]),
            Html(render(Some(&flash))),
        )
            .into_response(),
        None => Html(render(None)).into_response(),
    }
}

fn internal_error(err: anyhow::Error) -> Response {
    error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.repo.list().await {
        Ok(reports) => page_with_flash(&state, &headers, |flash| pages::index(&reports, flash)),
        Err(err) => internal_error(err),
    }
}

pub async fn run(State(state): State<AppState>, Form(form): Form<RunForm>) -> Response {
    let query = form.query.trim();
    if query.is_empty() {
        return redirect_with_flash(&state, "/", Flash::error("Please enter a query."));
    }

    let report = match state.agent.run(query).await {
        Ok(report) => report,
        Err(err) => return internal_error(err),
    };

    let flash = match ReportKind::from_summary(&report.summary_md) {
        ReportKind::SearchFailed => Flash::error("Search failed. Report saved with error details."),
        ReportKind::SummarizeFailed => {
            Flash::error("Summarization failed. Report saved with search results only.")
        }
        ReportKind::Completed => Flash::success("Report created successfully!"),
    };
    info!(report_id = report.id, "run finished");

    redirect_with_flash(&state, &format!("/report/{}", report.id), flash)
}

pub async fn show_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let report = match state.repo.find_by_id(id).await {
        Ok(Some(report)) => report,
        Ok(None) => return redirect_with_flash(&state, "/", Flash::error("Report not found.")),
        Err(err) => return internal_error(err),
    };

    let sources = match state.repo.sources_for(report.id).await {
        Ok(sources) => sources,
        Err(err) => return internal_error(err),
    };

    let summary_html = markdown::render(&report.summary_md);
    page_with_flash(&state, &headers, |flash| {
        pages::report(&report, &sources, &summary_html, flash)
    })
}

#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    responses(
        (status = 200, description = "All reports, newest first", body = [Report])
    )
)]
pub async fn api_list_reports(State(state): State<AppState>) -> Response {
    match state.repo.list().await {
        Ok(reports) => Json(reports).into_response(),
        Err(err) => internal_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "reports",
    params(("id" = i64, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report with its sources", body = ReportDetail),
        (status = 404, description = "No such report", body = ErrorResponse)
    )
)]
pub async fn api_get_report(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let report = match state.repo.find_by_id(id).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Report not found.".to_string(),
                }),
            )
                .into_response();
        }
        Err(err) => return internal_error(err),
    };

    match state.repo.sources_for(report.id).await {
        Ok(sources) => Json(ReportDetail { report, sources }).into_response(),
        Err(err) => internal_error(err),
    }
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
