//! Citizen report endpoints: submission, tracking, own-report listing.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{ReportEnvelope, ReportListEnvelope};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use nivaran_core::models::{CreateReportRequest, ReportResponse};
use nivaran_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponse {
    pub message: String,
    pub report_id: Uuid,
    pub report: ReportResponse,
}

/// Submit a complaint report.
///
/// `filePaths` must reference objects already uploaded through the signed-URL
/// pipeline; each key is checked against the storage gateway before anything
/// is persisted, so a report can never point at evidence that was never
/// uploaded. An empty list is valid - a report may be filed without evidence.
#[utoipa::path(
    post,
    path = "/api/user/reports",
    tag = "user",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report submitted", body = CreateReportResponse),
        (status = 400, description = "Invalid input or unknown file path", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        user_id = %auth.user_id,
        file_count = request.file_paths.len(),
        operation = "create_report"
    )
)]
pub async fn create_report(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    for key in &request.file_paths {
        let exists = state
            .storage
            .exists(key)
            .await
            .map_err(HttpAppError::from)?;
        if !exists {
            return Err(HttpAppError(AppError::BadRequest(format!(
                "Uploaded file not found in storage: {}",
                key
            ))));
        }
    }

    // First key is the cover image, the rest are secondary media.
    let mut file_paths = request.file_paths.into_iter();
    let image_url = file_paths.next();
    let media_urls: Vec<String> = file_paths.collect();

    let report = state
        .reports
        .create(
            request.title,
            request.description,
            image_url,
            media_urls,
            request.location,
            request.department,
            auth.user_id,
        )
        .await?;

    tracing::info!(report_id = %report.id, user_id = %auth.user_id, "Report submitted");

    let report = ReportResponse::from(report);
    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            message: "Report submitted successfully".to_string(),
            report_id: report.report_id,
            report,
        }),
    ))
}

/// Track a single report by id.
#[utoipa::path(
    get,
    path = "/api/user/reports/{report_id}",
    tag = "user",
    params(("report_id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report details", body = ReportEnvelope),
        (status = 404, description = "Report not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "track_report"))]
pub async fn track_report(
    _auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state
        .reports
        .find_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(ReportEnvelope {
        message: "Report details fetched successfully".to_string(),
        report: report.into(),
    }))
}

/// List the caller's own reports, newest first.
#[utoipa::path(
    get,
    path = "/api/user/my-reports",
    tag = "user",
    responses(
        (status = 200, description = "Caller's reports", body = ReportListEnvelope)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "my_reports"))]
pub async fn my_reports(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let reports = state
        .reports
        .list_by_creator(auth.user_id)
        .await?
        .into_iter()
        .map(ReportResponse::from)
        .collect();

    Ok(Json(ReportListEnvelope::new(
        "User complaints fetched successfully",
        reports,
    )))
}
