//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, require_role, AuthFailureLimiter, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    routing::{get, patch, post},
    Json, Router,
};
use nivaran_core::models::UserRole;
use nivaran_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let auth_state = Arc::new(AuthState {
        jwt: state.jwt.clone(),
        auth_failure_limiter: Some(Arc::new(AuthFailureLimiter::new(
            config.auth_max_failures(),
            config.auth_failure_window_secs(),
        ))),
    });

    // Public routes (no authentication required)
    let public_routes = public_routes(state.clone());

    // Protected routes (require authentication); role gates are layered per
    // route group inside protected_routes().
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Public routes (no authentication required)
fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .with_state(state)
}

/// Protected routes (require authentication).
fn protected_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .merge(file_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(head_routes(state.clone()))
        .merge(department_routes(state))
}

/// Signed-upload-URL routes: any authenticated role may request slots.
fn file_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/files/get-upload-urls",
            post(handlers::files::get_upload_urls),
        )
        .with_state(state)
}

/// Citizen routes
fn user_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/api/user/reports", post(handlers::reports::create_report))
        .route(
            "/api/user/reports/{report_id}",
            get(handlers::reports::track_report),
        )
        .route("/api/user/my-reports", get(handlers::reports::my_reports))
        .route_layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(UserRole::User, req, next)
        }))
        .with_state(state)
}

/// Head-administrator routes
fn head_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/head/complaints",
            get(handlers::head::list_complaints),
        )
        .route(
            "/api/head/complaints/{report_id}",
            get(handlers::head::get_complaint),
        )
        .route("/api/head/users", post(handlers::head::create_user))
        .route(
            "/api/head/complaints/{report_id}/flag",
            patch(handlers::head::flag_complaint),
        )
        .route(
            "/api/head/complaints/{report_id}/status",
            patch(handlers::head::update_status),
        )
        .route_layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(UserRole::Head, req, next)
        }))
        .with_state(state)
}

/// Department-official routes
fn department_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/department/complaints",
            get(handlers::department::list_complaints),
        )
        .route(
            "/api/department/complaints/filter/status",
            get(handlers::department::filter_complaints),
        )
        .route(
            "/api/department/complaints/{report_id}",
            get(handlers::department::get_complaint),
        )
        .route(
            "/api/department/complaints/{report_id}/status",
            patch(handlers::department::update_status),
        )
        .route(
            "/api/department/complaints/{report_id}/close",
            patch(handlers::department::close_complaint),
        )
        .route_layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(UserRole::Department, req, next)
        }))
        .with_state(state)
}

/// CORS setup: explicit origins with credentials when configured, permissive
/// otherwise (development).
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
        Method::PATCH,
    ];

    let cors = if config.cors_origins().is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
            .max_age(Duration::from_secs(86400))
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
            .max_age(Duration::from_secs(86400))
    };

    Ok(cors)
}
