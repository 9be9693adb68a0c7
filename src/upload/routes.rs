//! Upload routes

use axum::{extract::DefaultBodyLimit, middleware, routing::post, Router};

use super::handlers;
use super::validators::MAX_REQUEST_BODY;
use crate::auth::require_auth;

/// Creates and returns the upload router
///
/// # Routes
/// - `POST /upload` - Validate, transform and display an image
///
/// With `requires_auth` set, the route sits behind the session gate and
/// anonymous callers are redirected to the login flow.
pub fn upload_routes(requires_auth: bool) -> Router {
    let router = Router::new()
        .route("/upload", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY));

    if requires_auth {
        router.route_layer(middleware::from_fn(require_auth))
    } else {
        router
    }
}
