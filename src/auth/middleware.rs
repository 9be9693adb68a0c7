//! Session gate for protected routes

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

use super::session;

/// Entry point of the login flow; where anonymous callers are sent.
pub const LOGIN_PATH: &str = "/auth/google";

/// Passes the request through only when the session holds a user id.
///
/// Anything else, including a request that carries no session at all, is
/// redirected to the login route. The session is never written here.
pub async fn require_auth(session: Option<Session>, request: Request, next: Next) -> Response {
    let user_id = match &session {
        Some(session) => session::current_user_id(session).await,
        None => None,
    };

    match user_id {
        Some(_) => next.run(request).await,
        None => {
            debug!(path = %request.uri().path(), "No authenticated session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
