use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Converts diesel errors into [`AppError`] variants.
///
/// Constraint violations become client errors (`Duplicate`, `Validation`);
/// everything else is an opaque `Database` error carrying the operation name.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("Resource"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let detail = info.details().unwrap_or_default();
        let full = format!("{message}\n{detail}");
        let constraint = info.constraint_name();

        let converted = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_keyed_violation(&full, constraint).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_keyed_violation(&full, constraint).map(
                    |(entity, field, value)| AppError::Validation {
                        field,
                        reason: format!("Invalid reference from {entity} with value '{value}'"),
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_column_violation(&full, constraint).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Field is required for {entity}"),
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_column_violation(&full, constraint).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {entity}"),
                    },
                )
            }
            _ => None,
        };

        converted.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("{kind:?}: {message}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeInfo {
        message: String,
        details: Option<String>,
        constraint: Option<String>,
    }

    impl DatabaseErrorInformation for FakeInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &str, details: Option<&str>, constraint: Option<&str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(FakeInfo {
                message: message.to_string(),
                details: details.map(str::to_string),
                constraint: constraint.map(str::to_string),
            }),
        )
    }

    #[test]
    fn test_unique_violation_reads_value_from_details() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"users_email_key\"",
            Some("Key (email)=(guest@example.com) already exists."),
            Some("users_email_key"),
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert user") {
            AppError::Duplicate { entity, field, value } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "email");
                assert_eq!(value, "guest@example.com");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_key_violation_becomes_validation() {
        let error = db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "insert or update on table \"rooms\" violates foreign key constraint \"rooms_hotel_id_fkey\"",
            Some("Key (hotel_id)=(999) is not present in table \"hotels\"."),
            Some("rooms_hotel_id_fkey"),
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert room") {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "hotel_id");
                assert!(reason.contains("999"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_violation_falls_back_to_database_error() {
        let error = db_error(DatabaseErrorKind::UniqueViolation, "something odd", None, None);

        match DatabaseErrorConverter::convert_diesel_error(error, "insert hotel") {
            AppError::Database { operation, .. } => assert_eq!(operation, "insert hotel"),
            other => panic!("Expected Database, got {:?}", other),
        }
    }

    #[test]
    fn test_diesel_not_found() {
        let converted = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "load");
        assert!(matches!(converted, AppError::NotFound { .. }));
    }
}
