//! Cookie authentication.
//!
//! [`AccessToken`] pulls the raw token out of the `access_token` cookie and
//! [`CurrentUserId`] decodes it into a user id. Handlers that take
//! `CurrentUserId` are protected; the extractor runs before the handler body.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::AuthService;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Raw access token read from the request cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        CookieJar::from_headers(&parts.headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
            .map(AccessToken)
            .ok_or_else(|| AppError::unauthorized("No access token"))
    }
}

/// Id of the authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUserId(pub i32);

impl<S> FromRequestParts<S> for CurrentUserId
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let AccessToken(token) = AccessToken::from_request_parts(parts, state).await?;
        let auth = AuthService::from_ref(state);

        let user_id = auth.decode_access_token(&token)?.user_id()?;
        debug!(user_id, "Access token accepted");
        Ok(CurrentUserId(user_id))
    }
}
