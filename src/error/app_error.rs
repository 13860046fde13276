use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::DatabaseErrorConverter;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Every failure a request can end in.
///
/// Each variant has one HTTP status, assigned in `api::middleware::error_handler`.
/// `source` chains are logged but never rendered into a response body.
#[derive(Error, Debug)]
pub enum AppError {
    /// No record matched the given filters or ownership scope
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Unique constraint hit
    #[error("{entity}.{field} '{value}' is already taken")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// One field rejected, usually by a database constraint
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Payload rejected by `validator`
    #[error("{} invalid field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Body, path or query could not be parsed
    #[error("malformed request: {message}")]
    BadRequest { message: String },

    /// No credentials, or credentials that do not match
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Token present but unusable: bad signature, expired, wrong subject
    #[error("rejected token: {message}")]
    InvalidToken { message: String },

    /// A lookup that must yield at most one row matched several
    #[error("Expected at most one {entity}, found {found}")]
    AmbiguousMatch { entity: String, found: usize },

    #[error("{operation} failed")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("bad configuration at {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// No pooled connection within the checkout timeout
    #[error("database pool exhausted or unreachable")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    #[error("unexpected failure")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a [`AppError::NotFound`] naming the missing entity.
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: entity.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        AppError::InvalidToken {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        Self::Internal { source }
    }
}

/// Without an operation name; repositories call [`DatabaseErrorConverter`]
/// directly when they have one.
impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "query")
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::anyhow!("{error}"),
        }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "configuration".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| ValidationFieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", err.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: fields }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
