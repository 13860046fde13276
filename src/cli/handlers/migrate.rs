//! `migrate`: apply, preview or revert the embedded migrations.

use crate::config::Settings;
use crate::db;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;
        let url = self.config.database.url.clone();

        match (dry_run, rollback) {
            (true, _) => {
                let pending = blocking(move || db::pending_migrations(&url)).await?;
                report("pending", &pending, "database schema is current");
                if !pending.is_empty() {
                    println!("re-run without --dry-run to apply");
                }
            }
            (false, Some(steps)) => {
                let reverted = blocking(move || db::revert_migrations(&url, steps)).await?;
                report("reverted", &reverted, "nothing reverted");
            }
            (false, None) => {
                let applied = blocking(move || db::run_pending_migrations(&url)).await?;
                report("applied", &applied, "database schema is current");
            }
        }
        Ok(())
    }
}

fn report(verb: &str, versions: &[String], when_empty: &str) {
    if versions.is_empty() {
        println!("{when_empty}");
        return;
    }
    println!("{verb} {} migration(s):", versions.len());
    for version in versions {
        println!("  {version}");
    }
}

/// Diesel's migration harness is synchronous; keep it off the runtime threads.
async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
}
