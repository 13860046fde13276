//! Errors raised while loading or checking configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file missing: {0}")]
    FileNotFound(String),

    /// The merged sources did not fit [`crate::config::Settings`]
    #[error("cannot deserialize settings: {0}")]
    ParseError(String),

    #[error("invalid `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("bad environment variable: {0}")]
    EnvVarError(String),

    #[error("conflicting config sources: {0}")]
    MutualExclusivityError(String),

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        Self::MutualExclusivityError(message.into())
    }
}
