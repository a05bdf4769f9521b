//! Bearer-token verification and role gating.
//!
//! `auth_middleware` runs in front of every protected route group: it parses
//! the `Authorization: Bearer` header, verifies the token, and inserts an
//! `AuthContext` into request extensions. `require_role` layers a role check
//! on top for the `/api/user`, `/api/head`, and `/api/department` groups.

use crate::auth::jwt::JwtService;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use nivaran_core::models::UserRole;
use nivaran_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Per-IP counter of failed authentication attempts within a sliding window.
#[derive(Clone)]
pub struct AuthFailureLimiter {
    inner: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
    max_failures: u32,
    window: Duration,
}

impl AuthFailureLimiter {
    pub fn new(max_failures: u32, window_seconds: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_failures,
            window: Duration::from_secs(window_seconds),
        }
    }

    pub async fn record_failure(&self, ip: &str) -> bool {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        let (count, reset_at) = guard
            .entry(ip.to_string())
            .or_insert((0, now + self.window));
        if now >= *reset_at {
            *count = 0;
            *reset_at = now + self.window;
        }
        *count += 1;
        *count >= self.max_failures
    }

    pub async fn is_blocked(&self, ip: &str) -> bool {
        let mut guard = self.inner.lock().await;
        if let Some((count, reset_at)) = guard.get(ip) {
            if Instant::now() >= *reset_at {
                guard.remove(ip);
                return false;
            }
            return *count >= self.max_failures;
        }
        false
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
    pub auth_failure_limiter: Option<Arc<AuthFailureLimiter>>,
}

fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(|ip| ip.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    if let Some(ref limiter) = auth_state.auth_failure_limiter {
        if limiter.is_blocked(&ip).await {
            return (StatusCode::TOO_MANY_REQUESTS, "Too many failed auth attempts")
                .into_response();
        }
    }

    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return reject(
                &auth_state,
                &ip,
                AppError::Unauthorized("Missing authorization header".to_string()),
            )
            .await;
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return reject(
            &auth_state,
            &ip,
            AppError::Unauthorized("Invalid authorization header format".to_string()),
        )
        .await;
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    match auth_state.jwt.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthContext::from(claims));
            next.run(request).await
        }
        Err(err) => reject(&auth_state, &ip, err).await,
    }
}

async fn reject(auth_state: &AuthState, ip: &str, error: AppError) -> Response {
    if let Some(ref limiter) = auth_state.auth_failure_limiter {
        if limiter.record_failure(ip).await {
            return (StatusCode::TOO_MANY_REQUESTS, "Too many failed auth attempts")
                .into_response();
        }
    }
    tracing::debug!(client_ip = %ip, error = %error, "Authentication failed");
    HttpAppError(error).into_response()
}

/// Role gate for a route group. Must run after `auth_middleware` so the
/// `AuthContext` extension is present.
pub async fn require_role(role: UserRole, request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.role == role => next.run(request).await,
        Some(ctx) => {
            tracing::debug!(
                user_id = %ctx.user_id,
                have = %ctx.role,
                want = %role,
                "Role check failed"
            );
            HttpAppError(AppError::Forbidden(format!(
                "Requires the '{}' role",
                role
            )))
            .into_response()
        }
        None => HttpAppError(AppError::Unauthorized(
            "Missing authentication context".to_string(),
        ))
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limiter_blocks_after_max_failures() {
        let limiter = AuthFailureLimiter::new(3, 60);
        assert!(!limiter.is_blocked("10.0.0.1").await);

        assert!(!limiter.record_failure("10.0.0.1").await);
        assert!(!limiter.record_failure("10.0.0.1").await);
        assert!(limiter.record_failure("10.0.0.1").await);

        assert!(limiter.is_blocked("10.0.0.1").await);
        assert!(!limiter.is_blocked("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_limiter_window_resets() {
        let limiter = AuthFailureLimiter::new(2, 0);
        limiter.record_failure("10.0.0.1").await;
        limiter.record_failure("10.0.0.1").await;
        // Zero-second window: the entry expires immediately.
        assert!(!limiter.is_blocked("10.0.0.1").await);
    }
}
