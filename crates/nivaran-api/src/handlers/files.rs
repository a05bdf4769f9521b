//! Upload coordinator: mints one signed upload slot per described file.
//!
//! The coordinator never touches file content and persists nothing. Clients
//! PUT their bytes directly to the storage gateway using the returned URLs,
//! then reference the object keys when submitting the report.

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use nivaran_core::models::{UploadSlot, UploadUrlsRequest, UploadUrlsResponse};
use nivaran_core::AppError;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// Generate signed upload URLs for a batch of files.
///
/// The response sequence has the same length and order as the request
/// sequence; the slot at index *i* must only be used for the file described
/// at index *i*. Any single signing failure aborts the whole call - a
/// partial batch would leave the client with slots it cannot reconcile.
#[utoipa::path(
    post,
    path = "/api/files/get-upload-urls",
    tag = "files",
    request_body = UploadUrlsRequest,
    responses(
        (status = 200, description = "Signed upload URLs generated", body = UploadUrlsResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        user_id = %auth.user_id,
        file_count = request.files.len(),
        operation = "get_upload_urls"
    )
)]
pub async fn get_upload_urls(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadUrlsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let ttl = Duration::from_secs(state.config.upload_url_ttl_secs());
    let mut upload_urls = Vec::with_capacity(request.files.len());

    for file in &request.files {
        let key = nivaran_storage::upload_key(auth.user_id, &file.name)
            .map_err(HttpAppError::from)?;

        let signed_url = state
            .storage
            .presigned_put_url(&key, &file.content_type, ttl)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to generate signed URL: {}", e)))?;

        upload_urls.push(UploadSlot {
            file_name: key,
            signed_url,
            source_name: Some(file.name.clone()),
        });
    }

    tracing::info!(
        user_id = %auth.user_id,
        slot_count = upload_urls.len(),
        ttl_secs = ttl.as_secs(),
        "Generated signed upload URLs"
    );

    Ok(Json(UploadUrlsResponse { upload_urls }))
}
