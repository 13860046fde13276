//! Dispatches parsed commands to their handlers.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// What `main` should do after the command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Start the HTTP server
    Serve,
    /// The command completed; exit
    Done,
}

pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<Outcome> {
    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).validate_only()?;
            Ok(Outcome::Done)
        }
        Some(Commands::Serve { .. }) | None => Ok(Outcome::Serve),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(Outcome::Done)
        }
    }
}
