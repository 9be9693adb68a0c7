// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::services::{IdentityProvider, ImageTransformer, UserService};

/// Application state containing configuration, the database pool and the
/// clients for the two external services.
///
/// Shared as `Arc<AppState>` through an `Extension` layer; read-only once
/// the server starts.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: SqlitePool,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub transformer: Arc<dyn ImageTransformer>,
    pub users: UserService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: SqlitePool,
        identity_provider: Arc<dyn IdentityProvider>,
        transformer: Arc<dyn ImageTransformer>,
    ) -> Self {
        let users = UserService::new(db.clone());
        Self {
            config,
            db,
            identity_provider,
            transformer,
            users,
        }
    }
}
