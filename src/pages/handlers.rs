//! Static page handlers

use axum::{
    extract::Extension,
    http::{StatusCode, Uri},
    response::Html,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use super::views;
use crate::common::{ApiError, AppState};

/// GET /
pub async fn index() -> Html<String> {
    Html(views::render_index(&views::home_view()))
}

/// GET /about
pub async fn about() -> Html<String> {
    Html(views::render_about(&views::about_view()))
}

/// GET /health - liveness plus a database round-trip
pub async fn health(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Ok(Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!(error = %e, "Health check database query failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            ))
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No page at {}", uri.path()))
}
