//! Layered configuration loading

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "BOOKING_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "BOOKING_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "BOOKING";

/// Separator for nested keys: `BOOKING_DATABASE__URL` -> `database.url`
const ENV_SEPARATOR: &str = "__";

/// Merges TOML files and `BOOKING_*` variables into [`Settings`].
///
/// Later sources override earlier ones: `default.toml` (required), the
/// `<environment>.toml` overlay, `local.toml`, then the environment. A single
/// config file, when selected, stands in for all three files.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Picks up `BOOKING_CONFIG_DIR`, `BOOKING_CONFIG_FILE` and `BOOKING_APP_ENV`.
    /// Setting both of the first two is an error.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let config_file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);

        if let (Some(dir), Some(file)) = (&dir, &config_file) {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{CONFIG_DIR_ENV} ({}) and {CONFIG_FILE_ENV} ({}) are mutually exclusive",
                dir.display(),
                file.display()
            )));
        }

        Ok(Self {
            config_dir: dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loads a single file instead of the layered directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Builds, deserializes and validates the merged configuration.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self
            .build_config()?
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let files = match &self.config_file {
            Some(path) => vec![(path.clone(), true)],
            None => self.layered_files(),
        };

        let mut builder = Config::builder();
        for (path, required) in files {
            if required && !path.is_file() {
                return Err(ConfigError::file_not_found(format!(
                    "{} is required but does not exist",
                    path.display()
                )));
            }
            builder = builder
                .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }

    /// `default.toml`, then the environment overlay, then `local.toml`.
    fn layered_files(&self) -> Vec<(PathBuf, bool)> {
        let overlay = format!("{}.toml", self.environment.as_str());
        vec![
            (self.config_dir.join("default.toml"), true),
            (self.config_dir.join(overlay), false),
            (self.config_dir.join("local.toml"), false),
        ]
    }
}
