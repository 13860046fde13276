//! Merges CLI overrides over the file and environment configuration.
//!
//! Precedence, lowest first: configuration files, `BOOKING_*` variables,
//! global flags (`--verbose`/`--quiet`), subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration honouring `--config` and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env);
        }

        Ok(Self::new(loader.load()?))
    }

    /// Returns the base configuration with CLI overrides applied, validated.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/booking_test".to_string();
        config.jwt.secret = "merger-test-secret-with-at-least-32-chars".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_without_overrides_config_is_unchanged() {
        let merger = ConfigurationMerger::new(base_config());
        let cli = Cli::try_parse_from(["booking-rs"]).unwrap();
        assert_eq!(&merger.merge_cli_args(&cli).unwrap(), merger.config());
    }

    #[test]
    fn test_global_flags_set_level() {
        assert_eq!(merge(&["booking-rs", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["booking-rs", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let config = merge(&["booking-rs", "serve", "--host", "0.0.0.0", "--port", "9000"]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_subcommand_level_beats_global_flag() {
        let config = merge(&["booking-rs", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut config = base_config();
        config.jwt.secret = "short".to_string();
        let cli = Cli::try_parse_from(["booking-rs"]).unwrap();

        assert!(ConfigurationMerger::new(config).merge_cli_args(&cli).is_err());
    }
}
