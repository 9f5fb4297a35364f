//! Axum route handlers for the Analysis API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::analysis::analyzer::{analyze_url, AnalysisReport, AnalyzeRequest};
use crate::errors::AppError;
use crate::report::{render_report, report_filename, ReportSections};
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Scrapes the page, runs the rubric through the LLM and returns the parsed report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = analyze_url(&request.url, &state.scraper, &state.llm).await?;
    Ok(Json(report))
}

/// POST /api/v1/report/pdf
///
/// Renders report sections the client already holds. Nothing is re-analysed.
pub async fn handle_report_pdf(Json(sections): Json<ReportSections>) -> Result<Response, AppError> {
    pdf_response(sections).await
}

/// POST /api/v1/analyze/pdf
///
/// Analysis and PDF in one request, for scripted use.
pub async fn handle_analyze_pdf(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    let report = analyze_url(&request.url, &state.scraper, &state.llm).await?;
    pdf_response(ReportSections {
        domain: report.domain,
        analysis: report.sections.analysis,
        improvements: report.sections.improvements,
        rewrite: report.sections.rewrite,
    })
    .await
}

async fn pdf_response(sections: ReportSections) -> Result<Response, AppError> {
    let filename = report_filename(&sections.domain);

    let bytes = tokio::task::spawn_blocking(move || render_report(&sections))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
