//! Resolved logger options, after [`crate::config::LoggerSettings`] has been parsed

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileConfig,
    /// Handed to `EnvFilter` unchanged
    pub level: String,
}

impl LoggerConfig {
    /// Rejects unparseable filters, a file output without a path, and a
    /// logger with every output switched off.
    pub fn validate(&self) -> Result<()> {
        self.env_filter()
            .with_context(|| format!("cannot parse filter `{}`", self.level))?;
        self.file.validate().context("file output")?;
        if !(self.console.enabled || self.file.enabled) {
            bail!("console and file output are both disabled");
        }
        Ok(())
    }

    pub fn env_filter(&self) -> Result<EnvFilter> {
        Ok(EnvFilter::try_new(&self.level)?)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub colored: bool,
}

impl ConsoleConfig {
    pub fn new(enabled: bool, colored: bool) -> Self {
        Self { enabled, colored }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new(true, true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    /// Truncate on open when false
    pub append: bool,
    pub format: LogFormat,
}

impl FileConfig {
    pub fn new(enabled: bool, path: PathBuf, append: bool, format: LogFormat) -> Self {
        Self {
            enabled,
            path,
            append,
            format,
        }
    }

    /// Missing parent directories are not an error; the writer creates them.
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            bail!("enabled without a path");
        }
        Ok(())
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new(false, PathBuf::from("logs/booking.log"), true, LogFormat::Json)
    }
}

/// Event layout for the file output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        Ok(match raw.to_ascii_lowercase().as_str() {
            "full" => Self::Full,
            "compact" => Self::Compact,
            "json" => Self::Json,
            _ => bail!("unknown log format `{raw}` (full, compact, json)"),
        })
    }
}
