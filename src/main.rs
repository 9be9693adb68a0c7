// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod logging_middleware;
mod pages;
mod services;
mod upload;


// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppConfig, AppState};
use services::{GoogleOAuthClient, HuggingFaceClient};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        upload_requires_auth = config.upload_requires_auth,
        model_url = %config.inference.model_url,
        "Configuration loaded"
    );

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().build()?;

    let identity_provider = Arc::new(GoogleOAuthClient::new(config.google.clone()));
    info!("GoogleOAuthClient initialized");

    let transformer = Arc::new(HuggingFaceClient::new(config.inference.clone(), http_client));
    info!("HuggingFaceClient initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let addr = config.bind_address();
    let shared = Arc::new(AppState::new(config, pool, identity_provider, transformer));

    let app = build_router(shared);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    info!("Listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

/// Assembles every route with the shared state, the session layer and the
/// request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session_secure_cookie)
        .with_same_site(SameSite::Lax);

    Router::new()
        // Home, about and health
        .merge(pages::pages_routes())
        // Google login flow
        .merge(auth::auth_routes())
        // Image upload, optionally behind the session gate
        .merge(upload::upload_routes(state.config.upload_requires_auth))
        .fallback(pages::handlers::not_found)
        .layer(middleware::from_fn(logging_middleware::log_requests))
        .layer(Extension(state))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
