//! Database access: connection pool, scoped sessions and embedded migrations.

mod migrations;
mod pool;
mod session;

pub use migrations::{MIGRATIONS, pending_migrations, revert_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, establish_async_connection_pool, lazy_connection_pool};
pub use session::Database;
