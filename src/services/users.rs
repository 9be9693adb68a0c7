// src/services/users.rs
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::models::{GoogleUser, User};
use crate::common::safe_email_log;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email {0} is already linked to another account")]
    EmailConflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User records keyed by the identity provider's account id.
#[derive(Debug, Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_provider_id(&self, provider_id: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE provider_id = ?")
            .bind(provider_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    /// Returns the user for this external identity, creating it on first login.
    ///
    /// The external identity is the only lookup key: an existing row is
    /// returned as-is. A new identity whose email already belongs to a
    /// different identity is rejected with `EmailConflict`.
    pub async fn find_or_create(&self, profile: &GoogleUser) -> Result<User, UserError> {
        if let Some(user) = self.find_by_provider_id(&profile.id).await? {
            debug!(user_id = user.id, provider_id = %profile.id, "Found existing user");
            return Ok(user);
        }

        if self.find_by_email(&profile.email).await?.is_some() {
            warn!(
                provider_id = %profile.id,
                email = %safe_email_log(&profile.email),
                "Email already linked to a different Google account"
            );
            return Err(UserError::EmailConflict(profile.email.clone()));
        }

        let inserted = sqlx::query("INSERT INTO users (provider_id, email, image) VALUES (?, ?, ?)")
            .bind(&profile.id)
            .bind(&profile.email)
            .bind(profile.picture.as_deref())
            .execute(&self.db)
            .await;

        match inserted {
            Ok(result) => {
                let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                    .bind(result.last_insert_rowid())
                    .fetch_one(&self.db)
                    .await?;
                info!(
                    user_id = user.id,
                    email = %safe_email_log(&user.email),
                    provider = "google",
                    "Created new user account"
                );
                Ok(user)
            }
            // A concurrent login may have inserted the same identity or email.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                match self.find_by_provider_id(&profile.id).await? {
                    Some(user) => Ok(user),
                    None => Err(UserError::EmailConflict(profile.email.clone())),
                }
            }
            Err(e) => Err(UserError::Database(e)),
        }
    }
}
