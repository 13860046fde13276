//! Application state shared by every handler.

use axum::extract::FromRef;

use crate::config::JwtConfig;
use crate::db::{AsyncDbPool, Database};
use crate::services::AuthService;

/// Cloning is cheap: the pool is an `Arc` and the rest is small.
#[derive(Clone)]
pub struct AppState {
    /// Session provider for the request-scoped transactions
    pub db: Database,
    pub auth: AuthService,
}

impl AppState {
    /// Creates the state from a pool and the token settings.
    ///
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.jwt.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, jwt: JwtConfig) -> Self {
        let db = Database::new(pool);
        let auth = AuthService::new(db.clone(), jwt);
        Self { db, auth }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
