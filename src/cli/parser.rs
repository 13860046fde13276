//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{ConfigError, Environment};

/// Hotel and room booking API server
#[derive(Parser, Debug)]
#[command(name = "booking-rs")]
#[command(about = "Hotel and room booking API server")]
#[command(long_about = "
booking-rs serves the hotel, room and authentication HTTP API backed by
PostgreSQL. Configuration is read from config/default.toml, the
environment-specific file, config/local.toml and BOOKING_* variables.

EXAMPLES:
    # Start the server (default command)
    booking-rs serve

    # Bind to all interfaces on a custom port
    booking-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    booking-rs --config /etc/booking/production.toml serve

    # Validate configuration without starting
    booking-rs serve --dry-run

    # Apply, preview or roll back migrations
    booking-rs migrate
    booking-rs migrate --dry-run
    booking-rs migrate --rollback 1
")]
#[command(version = crate::pkg_version(), long_version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Single configuration file used instead of the config directory
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Overlay layered over default.toml: development, test, staging or
    /// production (dev, stage, prod also work)
    #[arg(short, long, value_name = "ENV", value_parser = parse_environment)]
    pub env: Option<Environment>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Error-level logging only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// TCP port to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Overrides --verbose/--quiet and the configured level
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply or revert the embedded schema migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert this many of the most recent migrations
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["booking-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose && !cli.quiet);
    }

    #[test]
    fn serve_overrides_are_parsed() {
        let cli = Cli::try_parse_from([
            "booking-rs",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "warning",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                dry_run,
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert_eq!(log_level, Some(LogLevel::Warn));
                assert!(!dry_run);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn env_flag_accepts_short_names() {
        let cli = Cli::try_parse_from(["booking-rs", "--env", "stage"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Staging));

        let err = Cli::try_parse_from(["booking-rs", "--env", "qa"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn migrate_dry_run_conflicts_with_rollback() {
        let err = Cli::try_parse_from(["booking-rs", "migrate", "--dry-run", "--rollback", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        let err = Cli::try_parse_from(["booking-rs", "-v", "-q"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
