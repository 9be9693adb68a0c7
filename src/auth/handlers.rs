//! Authentication handlers

use axum::{
    extract::{Extension, Query},
    response::Redirect,
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, error, info, warn};

use super::errors::AuthError;
use super::models::{CallbackParams, User};
use super::session;
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

/// GET /auth/google - Start Google OAuth flow
/// Stores a fresh state token in the session and redirects to Google
pub async fn google_login(
    Extension(state): Extension<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, ApiError> {
    let state_token = session::generate_state_token();
    session::store_pending_state(&session, &state_token).await?;

    let auth_url = state.identity_provider.authorization_url(&state_token);

    info!("Redirecting to Google OAuth");
    Ok(Redirect::to(&auth_url))
}

/// GET /auth/google/callback - Handle OAuth callback from Google
/// Completes the login and redirects home
pub async fn google_callback(
    Extension(state): Extension<Arc<AppState>>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, ApiError> {
    complete_login(&state, &session, &params).await?;
    Ok(Redirect::to("/"))
}

/// Runs the callback half of the authorization-code grant.
///
/// Order matters: the state check happens before any call to Google, and the
/// session is only written once the user record exists.
pub async fn complete_login(
    state: &AppState,
    session: &Session,
    params: &CallbackParams,
) -> Result<User, AuthError> {
    let expected = session::take_pending_state(session).await?;
    match (expected.as_deref(), params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        (None, _) => {
            warn!("OAuth callback without a pending login in session");
            return Err(AuthError::InvalidState);
        }
        _ => {
            warn!("OAuth callback state mismatch");
            return Err(AuthError::InvalidState);
        }
    }

    if let Some(reason) = &params.error {
        error!(oauth_error = %reason, "Google OAuth returned error");
        return Err(AuthError::ProviderDenied(reason.clone()));
    }

    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingCode)?;

    info!("Received OAuth callback with authorization code");

    let token = state
        .identity_provider
        .exchange_code(code)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to exchange authorization code for tokens");
            AuthError::ExchangeFailed(e)
        })?;

    debug!(
        access_token = %safe_token_log(&token.access_token),
        "Exchanged code for access token"
    );

    let profile = state
        .identity_provider
        .fetch_profile(&token.access_token)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch Google profile");
            AuthError::ProfileFetchFailed(e)
        })?;

    let user = state.users.find_or_create(&profile).await?;

    session::establish(session, &profile).await?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    Ok(user)
}
