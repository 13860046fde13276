//! Typed view of the layered configuration.
//!
//! Every section is `#[serde(default)]`, so a TOML file only has to name the
//! keys it changes. `Default` impls below are the single source of fallback
//! values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

/// Root of the configuration tree. Field names match the TOML section names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub application: ApplicationConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub logger: LoggerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: String::from("booking-rs"),
            version: String::from(crate::pkg_version()),
        }
    }
}

/// `[server]`: listener address and per-request deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds before an in-flight request is answered with 408
    pub request_timeout: u64,
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn address(&self) -> String {
        let Self { host, port, .. } = self;
        format!("{host}:{port}")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8000,
            request_timeout: 30,
        }
    }
}

/// `[database]`: Postgres URL and bb8 pool sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    /// Apply pending migrations on `serve`
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout: 30,
            auto_migrate: false,
        }
    }
}

/// `[jwt]`: access token signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HS256 key. Outside development it comes from `BOOKING_JWT__SECRET`.
    pub secret: String,
    pub access_token_expire_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expire_minutes: 30,
        }
    }
}

/// `[logger]` as written on disk. Converted to [`LoggerConfig`] before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Plain level or an `EnvFilter` directive such as `info,booking_rs=debug`
    pub level: String,
    pub console: ConsoleSettings,
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub enabled: bool,
    /// Ignored when stdout is not a terminal
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub enabled: bool,
    pub path: String,
    pub append: bool,
    /// One of `full`, `compact`, `json`
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: String::from("logs/booking.log"),
            append: true,
            format: String::from("json"),
        }
    }
}

impl LoggerSettings {
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let Self {
            level,
            console,
            file,
        } = self;

        let format: LogFormat = file
            .format
            .parse()
            .map_err(|e: anyhow::Error| ConfigError::validation("logger.file.format", e.to_string()))?;

        let logger = LoggerConfig {
            console: ConsoleConfig::new(console.enabled, console.colored),
            file: FileConfig::new(file.enabled, PathBuf::from(file.path), file.append, format),
            level,
        };
        logger
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        Ok(logger)
    }
}
