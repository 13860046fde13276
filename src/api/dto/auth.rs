//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

/// Email and password, used by both register and login.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 200, message = "Email must be at most 200 characters"))]
    #[schema(example = "guest@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 6, max = 72, message = "Password must be between 6 and 72 characters"))]
    #[schema(example = "password123", format = "password", min_length = 6, max_length = 72)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// Seconds until the token expires
    #[schema(example = 1800)]
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "guest@example.com")]
    pub email: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let bad = CredentialsRequest {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_me_hides_password_hash() {
        let me = MeResponse::from(User {
            id: 3,
            email: "guest@example.com".to_string(),
            hashed_password: "$argon2id$...".to_string(),
        });
        let body = serde_json::to_value(me).unwrap();
        assert!(body.get("hashed_password").is_none());
        assert_eq!(body["id"], 3);
    }
}
