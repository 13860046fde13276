//! Async database connection pool.
//!
//! Uses the bb8 pool manager with diesel_async PostgreSQL connections.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// bb8::Pool is an `Arc` internally, so cloning only bumps a reference count.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Builds the pool and waits for `min_connections` to be established.
///
/// # Errors
///
/// `AppError::ConnectionPool` if the initial connections cannot be opened.
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::new(e),
        })
}

/// Builds the pool without opening any connection up front.
///
/// Connections are established lazily on first checkout.
pub fn lazy_connection_pool(config: &DatabaseConfig) -> AsyncDbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build_unchecked(manager)
}
