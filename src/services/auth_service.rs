//! Authentication: registration, credential checks and access tokens.

use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::{info, warn};

use crate::config::JwtConfig;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repositories::{UserFilter, UsersRepository};
use crate::utils::jwt::{self, Claims};
use crate::utils::password;

/// Cloning is cheap: the pool is reference counted and the config is small.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(db: Database, jwt: JwtConfig) -> Self {
        Self { db, jwt }
    }

    pub fn create_access_token(&self, user_id: i32) -> AppResult<String> {
        jwt::generate_access_token(user_id, &self.jwt.secret, self.jwt.access_token_expire_minutes)
    }

    /// Verify a token and return its claims; failures are `AppError::InvalidToken`.
    pub fn decode_access_token(&self, token: &str) -> AppResult<Claims> {
        jwt::decode_access_token(token, &self.jwt.secret)
    }

    /// Token lifetime in seconds, reported to clients as `expires_in`. The
    /// cookie itself carries no `Max-Age`.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.jwt.access_token_expire_minutes.saturating_mul(60)
    }

    /// Create a user with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// `AppError::Duplicate` when the email is already registered.
    pub async fn register(&self, email: String, password: &str) -> AppResult<User> {
        let record = NewUser {
            email,
            hashed_password: password::hash_password(password)?,
        };

        let user = self
            .db
            .scoped(|conn| async move { UsersRepository::new(conn).add(record).await }.scope_boxed())
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and return the matching user.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let filter = UserFilter::email(email);
        let user = self
            .db
            .scoped(|conn| {
                async move { UsersRepository::new(conn).get_one_or_none(&filter).await }
                    .scope_boxed()
            })
            .await?;

        match user {
            Some(user) if password::verify_password(password, &user.hashed_password)? => Ok(user),
            _ => {
                warn!("Rejected login attempt");
                Err(AppError::unauthorized("Invalid email or password"))
            }
        }
    }

    pub async fn current_user(&self, user_id: i32) -> AppResult<User> {
        let filter = UserFilter::id(user_id);
        self.db
            .scoped(|conn| {
                async move { UsersRepository::new(conn).get_one_or_none(&filter).await }
                    .scope_boxed()
            })
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }
}
