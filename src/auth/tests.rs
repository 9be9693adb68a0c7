//! Tests for auth module
//!
//! These tests verify the login flow against stubbed Google endpoints:
//! - state token handling
//! - failure ordering in the callback
//! - what ends up in the session and the users table

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tower_sessions::{MemoryStore, Session};

    use super::super::errors::AuthError;
    use super::super::handlers::complete_login;
    use super::super::models::CallbackParams;
    use super::super::session::{
        self, generate_state_token, OAUTH_STATE_KEY, USER_EMAIL_KEY, USER_ID_KEY,
    };
    use crate::common::test_support::{
        google_user, test_state, StubIdentityProvider, StubTransformer,
    };
    use crate::common::ApiError;
    use crate::services::users::UserError;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn callback(state: &str, code: &str) -> CallbackParams {
        CallbackParams {
            state: Some(state.to_string()),
            code: Some(code.to_string()),
            error: None,
        }
    }

    #[test]
    fn test_state_tokens_are_random_alphanumeric() {
        let first = generate_state_token();
        let second = generate_state_token();

        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_successful_login_populates_session() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "expected-state")
            .await
            .unwrap();

        let user = complete_login(&state, &session, &callback("expected-state", "code-1"))
            .await
            .unwrap();

        assert_eq!(user.provider_id, "u1");
        assert_eq!(
            session.get::<String>(USER_ID_KEY).await.unwrap().as_deref(),
            Some("u1")
        );
        assert_eq!(
            session.get::<String>(USER_EMAIL_KEY).await.unwrap().as_deref(),
            Some("a@example.com")
        );
        // The pending state is consumed, leaving only the two user keys
        assert!(session
            .get::<String>(OAUTH_STATE_KEY)
            .await
            .unwrap()
            .is_none());
        assert_eq!(provider.exchange_count(), 1);
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_login_creates_user_once() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider,
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;

        for attempt in ["first", "second"] {
            let session = new_session();
            session::store_pending_state(&session, attempt).await.unwrap();
            complete_login(&state, &session, &callback(attempt, "code"))
                .await
                .unwrap();
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_state_mismatch_never_exchanges_code() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "expected-state")
            .await
            .unwrap();

        let err = complete_login(&state, &session, &callback("forged-state", "code-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidState));
        assert_eq!(provider.exchange_count(), 0);
        assert!(session::current_user_id(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_state_is_single_use() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "expected-state")
            .await
            .unwrap();

        // A failed attempt still consumes the token
        let params = CallbackParams {
            state: Some("expected-state".to_string()),
            code: None,
            error: None,
        };
        let err = complete_login(&state, &session, &params).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCode));

        let err = complete_login(&state, &session, &callback("expected-state", "code"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidState));
        assert_eq!(provider.exchange_count(), 0);
    }

    #[tokio::test]
    async fn test_callback_without_pending_login_is_rejected() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;

        let err = complete_login(&state, &new_session(), &callback("anything", "code"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidState));
        assert_eq!(provider.exchange_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_param_reported() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u1",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "s").await.unwrap();

        let params = CallbackParams {
            state: Some("s".to_string()),
            code: None,
            error: Some("access_denied".to_string()),
        };
        let err = complete_login(&state, &session, &params).await.unwrap_err();

        assert!(matches!(err, AuthError::ProviderDenied(ref r) if r == "access_denied"));
        assert_eq!(provider.exchange_count(), 0);
    }

    #[tokio::test]
    async fn test_exchange_failure_leaves_session_anonymous() {
        let provider = Arc::new(StubIdentityProvider::failing_exchange());
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "s").await.unwrap();

        let err = complete_login(&state, &session, &callback("s", "bad-code"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::ExchangeFailed(_)));
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 0);
        assert!(session::current_user_id(&session).await.is_none());

        let api_error: ApiError = err.into();
        assert_eq!(api_error.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_profile_failure_reported() {
        let provider = Arc::new(StubIdentityProvider::failing_profile());
        let state = test_state(
            true,
            provider.clone(),
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        let session = new_session();
        session::store_pending_state(&session, "s").await.unwrap();

        let err = complete_login(&state, &session, &callback("s", "code"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::ProfileFetchFailed(_)));
        assert_eq!(provider.exchange_count(), 1);
        assert!(session::current_user_id(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_email_conflict_blocks_login() {
        let provider = Arc::new(StubIdentityProvider::returning(google_user(
            "u2",
            "a@example.com",
        )));
        let state = test_state(
            true,
            provider,
            Arc::new(StubTransformer::returning(vec![])),
        )
        .await;
        state
            .users
            .find_or_create(&google_user("u1", "a@example.com"))
            .await
            .unwrap();

        let session = new_session();
        session::store_pending_state(&session, "s").await.unwrap();
        let err = complete_login(&state, &session, &callback("s", "code"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::User(UserError::EmailConflict(_))));
        assert!(session::current_user_id(&session).await.is_none());

        let api_error: ApiError = err.into();
        assert_eq!(api_error.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_state_maps_to_bad_request() {
        let api_error: ApiError = AuthError::InvalidState.into();
        assert_eq!(api_error.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert!(api_error.to_string().contains("Invalid OAuth state"));
    }
}
