//! Department-official endpoints, all scoped to the caller's department.
//!
//! A report outside the caller's department is indistinguishable from a
//! missing one (404), so officials cannot probe other departments' queues.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{ReportEnvelope, ReportListEnvelope};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use nivaran_core::models::{
    CloseReportRequest, ReportResponse, ReportStatus, UpdateStatusRequest,
};
use nivaran_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

/// The department a token must carry to use these endpoints.
fn department_of(auth: &AuthContext) -> Result<&str, HttpAppError> {
    auth.department.as_deref().ok_or_else(|| {
        HttpAppError(AppError::Forbidden(
            "No department assigned to this account".to_string(),
        ))
    })
}

/// List the department's complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/department/complaints",
    tag = "department",
    responses((status = 200, description = "Department complaints", body = ReportListEnvelope))
)]
#[tracing::instrument(skip(state), fields(operation = "department_list_complaints"))]
pub async fn list_complaints(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let department = department_of(&auth)?;

    let reports = state
        .reports
        .list_by_department(department)
        .await?
        .into_iter()
        .map(ReportResponse::from)
        .collect();

    Ok(Json(ReportListEnvelope::new(
        "All complaints fetched successfully",
        reports,
    )))
}

/// Fetch one of the department's complaints.
#[utoipa::path(
    get,
    path = "/api/department/complaints/{report_id}",
    tag = "department",
    params(("report_id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Complaint details", body = ReportEnvelope),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "department_get_complaint"))]
pub async fn get_complaint(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let department = department_of(&auth)?;

    let report = state
        .reports
        .find_by_id_in_department(report_id, department)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    Ok(Json(ReportEnvelope {
        message: "Complaint fetched successfully".to_string(),
        report: report.into(),
    }))
}

/// Update the status of one of the department's complaints.
#[utoipa::path(
    patch,
    path = "/api/department/complaints/{report_id}/status",
    tag = "department",
    params(("report_id" = Uuid, Path, description = "Report id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ReportEnvelope),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "department_update_status"))]
pub async fn update_status(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let department = department_of(&auth)?;

    let report = state
        .reports
        .update_status_in_department(report_id, department, request.status)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Report not found or unauthorized".to_string())
        })?;

    tracing::info!(
        report_id = %report_id,
        department = %department,
        status = %request.status,
        "Status updated by department"
    );

    Ok(Json(ReportEnvelope {
        message: "Complaint status updated successfully".to_string(),
        report: report.into(),
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatusFilter {
    pub status: ReportStatus,
}

/// Filter the department's complaints by status.
#[utoipa::path(
    get,
    path = "/api/department/complaints/filter/status",
    tag = "department",
    params(StatusFilter),
    responses(
        (status = 200, description = "Filtered complaints", body = ReportListEnvelope),
        (status = 400, description = "Invalid status filter", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "department_filter_complaints"))]
pub async fn filter_complaints(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, HttpAppError> {
    let department = department_of(&auth)?;

    let reports: Vec<ReportResponse> = state
        .reports
        .list_by_department_and_status(department, filter.status)
        .await?
        .into_iter()
        .map(ReportResponse::from)
        .collect();

    Ok(Json(ReportListEnvelope::new(
        format!(
            "Complaints with status '{}' fetched successfully",
            filter.status
        ),
        reports,
    )))
}

/// Close a complaint with resolution proof.
///
/// The solved image and media were uploaded by the official through the same
/// signed-URL pipeline as citizen evidence; their keys are existence-checked
/// before the report is updated and marked resolved.
#[utoipa::path(
    patch,
    path = "/api/department/complaints/{report_id}/close",
    tag = "department",
    params(("report_id" = Uuid, Path, description = "Report id")),
    request_body = CloseReportRequest,
    responses(
        (status = 200, description = "Complaint closed", body = ReportEnvelope),
        (status = 400, description = "Missing or unknown solved image path", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "department_close_complaint"))]
pub async fn close_complaint(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CloseReportRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    let department = department_of(&auth)?;

    for key in std::iter::once(&request.solved_image_path).chain(&request.solved_media_paths) {
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

    let report = state
        .reports
        .close_with_resolution(
            report_id,
            department,
            request.solved_image_path,
            request.solved_media_paths,
        )
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Complaint not found or not in your department".to_string())
        })?;

    tracing::info!(
        report_id = %report_id,
        department = %department,
        "Complaint closed with resolution proof"
    );

    Ok(Json(ReportEnvelope {
        message: "Complaint closed successfully with solved image and media".to_string(),
        report: report.into(),
    }))
}
