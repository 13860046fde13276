//! `serve --dry-run`: validate and report without binding.

use crate::config::Settings;
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.logger.clone().into_logger_config()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}..{} connections, auto_migrate = {}",
            self.config.database.min_connections,
            self.config.database.max_connections,
            self.config.database.auto_migrate
        );
        println!(
            "✓ Access tokens expire after {} minutes",
            self.config.jwt.access_token_expire_minutes
        );
        println!("Dry run completed successfully");
        Ok(())
    }
}
