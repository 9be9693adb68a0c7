//! Shared fixtures for unit tests: an in-memory database, a test config and
//! deterministic stand-ins for the two external services.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::config::{AppConfig, GoogleOAuthConfig, InferenceConfig};
use super::migrations::run_migrations;
use super::state::AppState;
use crate::auth::models::GoogleUser;
use crate::services::google::{GoogleError, IdentityProvider, TokenResponse};
use crate::services::huggingface::{ImageTransformer, TransformError};

pub async fn test_pool() -> SqlitePool {
    // One connection: every `sqlite::memory:` connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn test_config(upload_requires_auth: bool) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        google: GoogleOAuthConfig {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_url: "http://localhost:3000/auth/google/callback".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/userinfo.email".to_string()],
            auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
            token_url: "https://accounts.example.com/token".to_string(),
            userinfo_url: "https://accounts.example.com/userinfo".to_string(),
        },
        inference: InferenceConfig {
            api_key: "hf-test-key".to_string(),
            model_url: "https://inference.example.com/models/test".to_string(),
        },
        upload_requires_auth,
        session_secure_cookie: false,
    }
}

pub fn google_user(id: &str, email: &str) -> GoogleUser {
    GoogleUser {
        id: id.to_string(),
        email: email.to_string(),
        verified_email: true,
        name: None,
        given_name: None,
        family_name: None,
        picture: None,
        locale: None,
    }
}

/// Identity provider returning canned responses and counting calls.
pub struct StubIdentityProvider {
    pub profile: Option<GoogleUser>,
    pub exchange_fails: bool,
    pub exchange_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl StubIdentityProvider {
    pub fn returning(profile: GoogleUser) -> Self {
        Self {
            profile: Some(profile),
            exchange_fails: false,
            exchange_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_exchange() -> Self {
        Self {
            profile: None,
            exchange_fails: true,
            exchange_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_profile() -> Self {
        Self {
            profile: None,
            exchange_fails: false,
            exchange_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.com/o/oauth2/auth?state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if self.exchange_fails {
            return Err(GoogleError::OAuthFailed("HTTP 400: invalid_grant".to_string()));
        }
        Ok(TokenResponse {
            access_token: format!("token-for-{}", code),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
            id_token: None,
        })
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<GoogleUser, GoogleError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or_else(|| GoogleError::OAuthFailed("HTTP 401: unauthorized".to_string()))
    }
}

/// Image transformer answering with fixed bytes or a fixed HTTP failure.
pub struct StubTransformer {
    pub response: Result<Vec<u8>, (u16, String)>,
    pub calls: AtomicUsize,
}

impl StubTransformer {
    pub fn returning(bytes: Vec<u8>) -> Self {
        Self {
            response: Ok(bytes),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            response: Err((status, body.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageTransformer for StubTransformer {
    async fn transform(&self, _image_base64: &str) -> Result<Vec<u8>, TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(bytes) => Ok(bytes.clone()),
            Err((status, body)) => Err(TransformError::Failed {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

pub async fn test_state(
    upload_requires_auth: bool,
    identity_provider: Arc<StubIdentityProvider>,
    transformer: Arc<StubTransformer>,
) -> Arc<AppState> {
    Arc::new(AppState::new(
        test_config(upload_requires_auth),
        test_pool().await,
        identity_provider,
        transformer,
    ))
}
