// src/common/config.rs
//! Application configuration loaded from environment variables
//!
//! Built once at startup and handed to `AppState`. Nothing here is mutated
//! after construction.

use std::env;
use thiserror::Error;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/timbrooks/instruct-pix2pix";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Google OAuth client settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// Hugging Face inference endpoint settings
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub api_key: String,
    pub model_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// SQLite database URL
    pub database_url: String,
    pub google: GoogleOAuthConfig,
    pub inference: InferenceConfig,
    /// Gate `POST /upload` behind a logged-in session (default: true)
    pub upload_requires_auth: bool,
    /// Mark the session cookie `Secure` (default: false)
    pub session_secure_cookie: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(key))
        };
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v.trim().to_lowercase() == "true")
                .unwrap_or(default)
        };

        let port_raw = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let google = GoogleOAuthConfig {
            client_id: required("GOOGLE_CLIENT_ID")?,
            client_secret: required("GOOGLE_CLIENT_SECRET")?,
            redirect_url: lookup("GOOGLE_OAUTH_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost:3000/auth/google/callback".to_string()),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        };

        let inference = InferenceConfig {
            api_key: required("HUGGINGFACE_KEY")?,
            model_url: lookup("HUGGINGFACE_MODEL_URL")
                .unwrap_or_else(|| DEFAULT_MODEL_URL.to_string()),
        };

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://profile_studio.db".to_string()),
            google,
            inference,
            upload_requires_auth: flag("UPLOAD_REQUIRES_AUTH", true),
            session_secure_cookie: flag("SESSION_SECURE_COOKIE", false),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
