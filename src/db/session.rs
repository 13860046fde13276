//! Request-scoped database sessions.

use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::debug;

use crate::db::AsyncDbPool;
use crate::error::AppResult;

/// Session provider handed to every handler through application state.
///
/// [`Database::scoped`] checks a connection out of the pool, opens a
/// transaction, runs the closure and commits on `Ok` or rolls back on `Err`.
/// The connection returns to the pool on every exit path, including panics
/// and cancelled requests.
#[derive(Clone)]
pub struct Database {
    pool: AsyncDbPool,
}

impl Database {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AsyncDbPool {
        &self.pool
    }

    /// Run `work` inside one transaction on one pooled connection.
    ///
    /// ```ignore
    /// let rooms = db
    ///     .scoped(|conn| {
    ///         async move { RoomsRepository::new(conn).get_all(&filter).await }.scope_boxed()
    ///     })
    ///     .await?;
    /// ```
    pub async fn scoped<'a, T, F>(&self, work: F) -> AppResult<T>
    where
        F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, AppResult<T>>
            + Send
            + 'a,
        T: Send + 'a,
    {
        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let result = conn.transaction(work).await;
        if let Err(ref e) = result {
            debug!(error = %e, "Transaction rolled back");
        }
        result
    }
}
