//! Signup and login.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use nivaran_core::models::{AuthResponse, LoginRequest, SignupRequest, UserResponse, UserRole};
use nivaran_core::AppError;
use std::sync::Arc;
use validator::Validate;

/// bcrypt runs ~100ms of CPU work; keep it off the async workers.
pub(crate) async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "signup"))]
pub async fn signup(
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

    let password_hash = hash_password(request.password).await?;

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

    let token = state.jwt.issue_for_user(&user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: UserResponse::from(&user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let email = request.email.trim().to_lowercase();

    // Same response for unknown email and wrong password: don't leak which
    // accounts exist.
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(HttpAppError(AppError::BadRequest(
            "Invalid credentials".to_string(),
        )));
    }

    let token = state.jwt.issue_for_user(&user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Login successful");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(&user),
    }))
}
