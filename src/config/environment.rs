//! Deployment environment selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Selects the `config/<name>.toml` overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub const ENV_VAR: &'static str = "BOOKING_APP_ENV";

    const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// `BOOKING_APP_ENV`, or `Development` when it is unset or unrecognised.
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(raw) => raw.parse().unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// File stem of the overlay for this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    fn short_alias(&self) -> Option<&'static str> {
        match self {
            Self::Development => Some("dev"),
            Self::Staging => Some("stage"),
            Self::Production => Some("prod"),
            Self::Test => None,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == wanted || env.short_alias() == Some(wanted.as_str()))
            .ok_or_else(|| {
                ConfigError::EnvVarError(format!(
                    "unknown environment '{raw}', expected one of development, test, staging, production"
                ))
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_and_case_are_accepted() {
        let cases = [
            ("dev", Environment::Development),
            ("Stage", Environment::Staging),
            ("PROD", Environment::Production),
            ("test", Environment::Test),
            (" production ", Environment::Production),
        ];
        for (raw, expected) in cases {
            assert_eq!(raw.parse::<Environment>().unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        match "qa".parse::<Environment>() {
            Err(ConfigError::EnvVarError(msg)) => assert!(msg.contains("'qa'")),
            other => panic!("expected EnvVarError, got {other:?}"),
        }
    }

    #[test]
    fn display_is_the_overlay_file_stem() {
        assert_eq!(Environment::Staging.to_string(), "staging");
        assert_eq!(Environment::default().as_str(), "development");
    }
}
