//! Settings for every subsystem, read from `config/*.toml` and `BOOKING_*`
//! variables. See [`ConfigLoader`] for the precedence rules.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, ConsoleSettings, DatabaseConfig, FileSettings, JwtConfig, LoggerSettings,
    ServerConfig, Settings,
};
