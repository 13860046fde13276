//! Schema migrations compiled into the binary.
//!
//! `MigrationHarness` only exists for synchronous connections, so these
//! functions block. Async callers go through `spawn_blocking`.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type HarnessError = Box<dyn std::error::Error + Send + Sync>;

fn harness_failed(step: &'static str) -> impl FnOnce(HarnessError) -> AppError {
    move |e| AppError::Database {
        operation: step.to_owned(),
        source: anyhow::anyhow!(e),
    }
}

fn open(database_url: &str) -> AppResult<PgConnection> {
    PgConnection::establish(database_url).map_err(|e| AppError::Database {
        operation: "connect for migrations".to_owned(),
        source: e.into(),
    })
}

pub fn pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    let mut conn = open(database_url)?;
    let pending = conn
        .pending_migrations(MIGRATIONS)
        .map_err(harness_failed("list pending migrations"))?;
    Ok(pending.into_iter().map(|m| m.name().to_string()).collect())
}

/// Returns the versions that were applied, oldest first.
pub fn run_pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    let mut conn = open(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(harness_failed("apply migrations"))?;
    Ok(applied.into_iter().map(|v| v.to_string()).collect())
}

/// Reverts the newest `steps` migrations. Asking for more than are applied
/// reverts nothing and fails.
pub fn revert_migrations(database_url: &str, steps: u32) -> AppResult<Vec<String>> {
    let mut conn = open(database_url)?;
    let applied = conn
        .applied_migrations()
        .map_err(harness_failed("list applied migrations"))?
        .len();
    let steps = steps as usize;
    if steps > applied {
        return Err(AppError::Validation {
            field: "rollback".to_owned(),
            reason: format!("{steps} requested, only {applied} applied"),
        });
    }

    (0..steps)
        .map(|_| {
            conn.revert_last_migration(MIGRATIONS)
                .map(|version| version.to_string())
                .map_err(harness_failed("revert migration"))
        })
        .collect()
}
