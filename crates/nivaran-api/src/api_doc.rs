//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use nivaran_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nivaran API",
        version = "0.1.0",
        description = "Civic-complaint reporting API. Citizens submit issue reports with photo/video/audio evidence uploaded directly to object storage via signed URLs; department officials and the head administrator triage and resolve them."
    ),
    paths(
        // Health
        handlers::health::health,
        // Auth
        handlers::auth::signup,
        handlers::auth::login,
        // Files (signed upload URLs)
        handlers::files::get_upload_urls,
        // Citizen reports
        handlers::reports::create_report,
        handlers::reports::track_report,
        handlers::reports::my_reports,
        // Head administrator
        handlers::head::list_complaints,
        handlers::head::get_complaint,
        handlers::head::create_user,
        handlers::head::flag_complaint,
        handlers::head::update_status,
        // Department officials
        handlers::department::list_complaints,
        handlers::department::get_complaint,
        handlers::department::update_status,
        handlers::department::filter_complaints,
        handlers::department::close_complaint,
    ),
    components(
        schemas(
            // Auth models
            models::SignupRequest,
            models::LoginRequest,
            models::AuthResponse,
            models::UserResponse,
            models::UserRole,
            // Upload models
            models::UploadUrlsRequest,
            models::FileSpec,
            models::UploadUrlsResponse,
            models::UploadSlot,
            // Report models
            models::CreateReportRequest,
            models::UpdateStatusRequest,
            models::CloseReportRequest,
            models::ReportResponse,
            models::ReportStatus,
            models::ReporterSummary,
            // Envelopes
            handlers::ReportEnvelope,
            handlers::ReportListEnvelope,
            handlers::reports::CreateReportResponse,
            handlers::head::CreateUserResponse,
            handlers::health::HealthResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "auth", description = "Signup and login"),
        (name = "files", description = "Signed upload URL generation for direct-to-storage uploads"),
        (name = "user", description = "Citizen report submission and tracking"),
        (name = "head", description = "Head administrator triage and account provisioning"),
        (name = "department", description = "Department-scoped complaint handling")
    )
)]
pub struct ApiDoc;
