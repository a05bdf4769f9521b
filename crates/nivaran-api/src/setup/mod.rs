//! Application initialization: database pool, storage backend, routes.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Context;
use axum::Router;
use nivaran_core::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Build the application state and router from configuration.
pub async fn initialize_app(config: Config) -> anyhow::Result<(Arc<AppState>, Router)> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection established");

    let storage = nivaran_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = ?storage.backend_type(), "Storage backend initialized");

    let state = Arc::new(AppState::new(config.clone(), pool, storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
