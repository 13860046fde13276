use std::sync::OnceLock;

use regex::Regex;

/// Extracts structured details from PostgreSQL constraint violation messages.
///
/// Postgres reports violations as free text (`Key (email)=(a@b.c) already exists.`)
/// plus an optional constraint name (`users_email_key`). The parser prefers the
/// constraint name and falls back to the message text.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column: Regex,
    table: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Suffixes Postgres appends to generated constraint names.
const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_fkey", "_check", "_pkey", "_idx"];

impl ConstraintParser {
    fn patterns() -> &'static Patterns {
        PATTERNS.get_or_init(|| Patterns {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value regex"),
            column: Regex::new(r#"column "([^"]+)""#).expect("valid column regex"),
            table: Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("valid table regex"),
        })
    }

    /// Splits a generated constraint name into `(table, column)`.
    ///
    /// `rooms_hotel_id_fkey` -> `("rooms", "hotel_id")`. Table names are assumed
    /// to contain no underscore, which holds for this schema.
    pub fn split_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// `Key (field)=(value)` from a violation detail.
    pub fn key_value(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns().key_value.captures(message)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn column(message: &str) -> Option<String> {
        Self::patterns()
            .column
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn table(message: &str) -> Option<String> {
        Self::patterns()
            .table
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// `(entity, field, value)` for unique and foreign key violations.
    pub fn parse_keyed_violation(
        message: &str,
        constraint: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::key_value(message);

        if let Some((entity, field)) = constraint.and_then(Self::split_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "unknown".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// `(entity, field)` for not-null and check violations.
    pub fn parse_column_violation(
        message: &str,
        constraint: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(field) = Self::column(message) {
            let entity = Self::table(message)
                .or_else(|| constraint.and_then(Self::split_constraint_name).map(|(e, _)| e))
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }
        constraint.and_then(Self::split_constraint_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_from_constraint_name() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(guest@example.com) already exists.";
        let parsed = ConstraintParser::parse_keyed_violation(message, Some("users_email_key"));
        assert_eq!(
            parsed,
            Some((
                "users".to_string(),
                "email".to_string(),
                "guest@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_foreign_key_keeps_multi_part_column() {
        let message = "insert or update on table \"rooms\" violates foreign key constraint \"rooms_hotel_id_fkey\"\nDETAIL: Key (hotel_id)=(42) is not present in table \"hotels\".";
        let parsed = ConstraintParser::parse_keyed_violation(message, Some("rooms_hotel_id_fkey"));
        assert_eq!(
            parsed,
            Some(("rooms".to_string(), "hotel_id".to_string(), "42".to_string()))
        );
    }

    #[test]
    fn test_keyed_violation_without_constraint_uses_message() {
        let message = "duplicate key value on table \"hotels\"\nDETAIL: Key (title)=(Grand) already exists.";
        let parsed = ConstraintParser::parse_keyed_violation(message, None);
        assert_eq!(
            parsed,
            Some(("hotels".to_string(), "title".to_string(), "Grand".to_string()))
        );
    }

    #[test]
    fn test_not_null_violation() {
        let message =
            "null value in column \"name\" of relation \"rooms\" violates not-null constraint";
        let parsed = ConstraintParser::parse_column_violation(message, None);
        assert_eq!(parsed, Some(("rooms".to_string(), "name".to_string())));
    }

    #[test]
    fn test_check_violation_from_constraint_name() {
        let message = "new row violates check constraint \"rooms_price_check\"";
        let parsed = ConstraintParser::parse_column_violation(message, Some("rooms_price_check"));
        assert_eq!(parsed, Some(("rooms".to_string(), "price".to_string())));
    }

    #[test]
    fn test_unrecognised_constraint_name() {
        assert_eq!(ConstraintParser::split_constraint_name("weird"), None);
        assert_eq!(ConstraintParser::split_constraint_name("_key"), None);
    }
}
