//! Session keys and the reads/writes the login flow makes against them

use rand::{distributions::Alphanumeric, Rng};
use tower_sessions::Session;
use tracing::warn;

use super::errors::AuthError;
use super::models::GoogleUser;

/// External identity of the logged-in user
pub const USER_ID_KEY: &str = "user_id";
pub const USER_EMAIL_KEY: &str = "user_email";
/// CSRF token of a login attempt that has not come back yet
pub const OAUTH_STATE_KEY: &str = "oauth_state";

const STATE_TOKEN_LEN: usize = 32;

pub fn generate_state_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub async fn store_pending_state(session: &Session, state: &str) -> Result<(), AuthError> {
    session.insert(OAUTH_STATE_KEY, state).await?;
    Ok(())
}

/// Removes the pending state so it can be used once only.
pub async fn take_pending_state(session: &Session) -> Result<Option<String>, AuthError> {
    Ok(session.remove::<String>(OAUTH_STATE_KEY).await?)
}

/// Marks the session as authenticated for `profile` and persists it.
///
/// The session id is rotated first so an id handed out before login
/// cannot be reused afterwards.
pub async fn establish(session: &Session, profile: &GoogleUser) -> Result<(), AuthError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, &profile.id).await?;
    session.insert(USER_EMAIL_KEY, &profile.email).await?;
    session.save().await?;
    Ok(())
}

pub async fn current_user_id(session: &Session) -> Option<String> {
    match session.get::<String>(USER_ID_KEY).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(error = %e, "Failed to read session");
            None
        }
    }
}
