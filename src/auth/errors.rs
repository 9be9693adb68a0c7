//! Failures of the Google login flow

use thiserror::Error;
use tracing::warn;

use crate::common::ApiError;
use crate::services::google::GoogleError;
use crate::services::users::UserError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid OAuth state")]
    InvalidState,

    #[error("Authorization denied by provider: {0}")]
    ProviderDenied(String),

    #[error("No authorization code provided")]
    MissingCode,

    #[error("Code exchange failed: {0}")]
    ExchangeFailed(GoogleError),

    #[error("Failed to get user info: {0}")]
    ProfileFetchFailed(GoogleError),

    #[error("Failed to process user: {0}")]
    User(#[from] UserError),

    #[error("Failed to save session: {0}")]
    SessionPersistFailed(String),
}

impl From<tower_sessions::session::Error> for AuthError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AuthError::SessionPersistFailed(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        warn!(error = %e, "Google login failed");
        match e {
            AuthError::InvalidState => ApiError::BadRequest("Invalid OAuth state".to_string()),
            AuthError::ProviderDenied(reason) => {
                ApiError::BadRequest(format!("Authorization failed: {}", reason))
            }
            AuthError::MissingCode => {
                ApiError::BadRequest("No authorization code provided".to_string())
            }
            AuthError::ExchangeFailed(_) => {
                ApiError::InternalServer("Code exchange failed".to_string())
            }
            AuthError::ProfileFetchFailed(_) => {
                ApiError::InternalServer("Failed to get user info".to_string())
            }
            AuthError::User(UserError::EmailConflict(_)) => ApiError::Conflict(
                "This email is already linked to another account".to_string(),
            ),
            AuthError::User(UserError::Database(e)) => ApiError::DatabaseError(e),
            AuthError::SessionPersistFailed(_) => {
                ApiError::InternalServer("Failed to save session".to_string())
            }
        }
    }
}
