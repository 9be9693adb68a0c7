//! Page routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the page router
///
/// # Routes
/// - `GET /` - Home page with the upload form
/// - `GET /about` - About page
/// - `GET /health` - Health check
pub fn pages_routes() -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/about", get(handlers::about))
        .route("/health", get(handlers::health))
}
