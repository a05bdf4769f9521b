//! Application state shared by all handlers.

use crate::auth::JwtService;
use nivaran_core::Config;
use nivaran_db::{ReportRepository, UserRepository};
use nivaran_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserRepository,
    pub reports: ReportRepository,
    pub storage: Arc<dyn Storage>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, storage: Arc<dyn Storage>) -> Self {
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_expiry_hours());
        AppState {
            users: UserRepository::new(pool.clone()),
            reports: ReportRepository::new(pool),
            storage,
            jwt,
            config,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
