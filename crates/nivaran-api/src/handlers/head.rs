//! Head-administrator endpoints: global triage and account provisioning.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{ReportEnvelope, ReportListEnvelope};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use nivaran_core::models::{
    ReportResponse, SignupRequest, UpdateStatusRequest, UserResponse, UserRole,
};
use nivaran_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: UserResponse,
}

/// List every complaint, newest first.
#[utoipa::path(
    get,
    path = "/api/head/complaints",
    tag = "head",
    responses((status = 200, description = "All complaints", body = ReportListEnvelope))
)]
#[tracing::instrument(skip(state), fields(operation = "head_list_complaints"))]
pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let reports = state
        .reports
        .list_all()
        .await?
        .into_iter()
        .map(ReportResponse::from)
        .collect();

    Ok(Json(ReportListEnvelope::new(
        "All complaints fetched successfully",
        reports,
    )))
}

/// Fetch one complaint by id.
#[utoipa::path(
    get,
    path = "/api/head/complaints/{report_id}",
    tag = "head",
    params(("report_id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Complaint details", body = ReportEnvelope),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "head_get_complaint"))]
pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state
        .reports
        .find_by_id(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    Ok(Json(ReportEnvelope {
        message: "Complaint fetched successfully".to_string(),
        report: report.into(),
    }))
}

/// Provision an official account (head or department) or a citizen account.
#[utoipa::path(
    post,
    path = "/api/head/users",
    tag = "head",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = CreateUserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "head_create_user"))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let email = request.email.trim().to_lowercase();
    if state.users.email_exists(&email).await? {
        return Err(HttpAppError(AppError::Conflict(
            "User already exists".to_string(),
        )));
    }

    let password_hash = crate::handlers::auth::hash_password(request.password).await?;

    let user = state
        .users
        .create(
            request.name.trim().to_string(),
            email,
            password_hash,
            request.phone,
            request.role.unwrap_or(UserRole::User),
            request.department,
        )
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account provisioned by head");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User account created successfully".to_string(),
            user: UserResponse::from(&user),
        }),
    ))
}

/// Flag a complaint for attention.
#[utoipa::path(
    patch,
    path = "/api/head/complaints/{report_id}/flag",
    tag = "head",
    params(("report_id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Complaint flagged", body = ReportEnvelope),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "head_flag_complaint"))]
pub async fn flag_complaint(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state
        .reports
        .set_flag(report_id, true)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    Ok(Json(ReportEnvelope {
        message: "Complaint flagged successfully".to_string(),
        report: report.into(),
    }))
}

/// Update a complaint's triage status.
#[utoipa::path(
    patch,
    path = "/api/head/complaints/{report_id}/status",
    tag = "head",
    params(("report_id" = Uuid, Path, description = "Report id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ReportEnvelope),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "head_update_status"))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state
        .reports
        .update_status(report_id, request.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    tracing::info!(report_id = %report_id, status = %request.status, "Status updated by head");

    Ok(Json(ReportEnvelope {
        message: "Complaint status updated successfully".to_string(),
        report: report.into(),
    }))
}
