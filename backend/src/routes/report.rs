//! PDF report download routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{PdfReport, ReportService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Create PDF report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/diet/:id", get(diet_pdf))
        .route("/training/:id", get(training_pdf))
        .route("/progress", get(progress_pdf))
}

/// GET /api/v1/pdf/diet/:id
async fn diet_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "diet")?;
    let report = ReportService::diet(state.db(), state.pdf(), auth.user_id, id).await?;
    attachment(report)
}

/// GET /api/v1/pdf/training/:id
async fn training_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "training")?;
    let report = ReportService::training(state.db(), state.pdf(), auth.user_id, id).await?;
    attachment(report)
}

/// GET /api/v1/pdf/progress
async fn progress_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let report = ReportService::progress(state.db(), state.pdf(), auth.user_id).await?;
    attachment(report)
}

fn attachment(report: PdfReport) -> ApiResult<(HeaderMap, Vec<u8>)> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.filename
    ))
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid report filename: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, report.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_headers() {
        let report = PdfReport {
            filename: "diet.pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        };

        let response = attachment(report).unwrap().into_response();
        let headers = response.headers();

        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"diet.pdf\""
        );
    }
}
