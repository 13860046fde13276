use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Access token claims. `sub` carries the user id as a decimal string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, expire_minutes: i64) -> Self {
        let now = jiff::Timestamp::now().as_second();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(expire_minutes.saturating_mul(60)),
        }
    }

    /// # Errors
    ///
    /// `AppError::InvalidToken` if `sub` is not an integer.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::invalid_token("Token subject is not a user id"))
    }
}

/// Sign an HS256 access token for `user_id`.
pub fn generate_access_token(user_id: i32, secret: &str, expire_minutes: i64) -> AppResult<String> {
    let claims = Claims::new(user_id, expire_minutes);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Verify signature and expiry, returning the claims.
///
/// Every failure maps to `AppError::InvalidToken`.
pub fn decode_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::invalid_token("Token has expired"),
        ErrorKind::InvalidSignature => AppError::invalid_token("Invalid token signature"),
        ErrorKind::InvalidToken => AppError::invalid_token("Invalid token"),
        _ => AppError::invalid_token(format!("Token validation failed: {}", e)),
    })
}
