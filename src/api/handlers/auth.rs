//! Registration, login and the cookie-protected identity endpoint.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{CredentialsRequest, ErrorResponse, MeResponse, StatusResponse, TokenResponse};
use crate::api::middleware::{ACCESS_TOKEN_COOKIE, CurrentUserId};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// # Routes
/// - `POST /auth/register`
/// - `POST /auth/login` - sets the `access_token` cookie
/// - `GET /auth/me` - requires the cookie
/// - `POST /auth/logout` - clears the cookie
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(me))
        .routes(routes!(logout))
}

fn access_token_cookie(value: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = AUTH_TAG,
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered", body = StatusResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<StatusResponse>> {
    state.auth.register(req.email, &req.password).await?;
    Ok(Json(StatusResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = AUTH_TAG,
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in; access_token cookie set", body = TokenResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let user = state.auth.authenticate(&req.email, &req.password).await?;
    let access_token = state.auth.create_access_token(user.id)?;
    info!(user_id = user.id, "User logged in");

    let jar = jar.add(access_token_cookie(access_token.clone()));
    Ok((
        jar,
        Json(TokenResponse {
            access_token,
            expires_in: state.auth.access_token_ttl_secs(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse)
    ),
    security(("cookieAuth" = []))
)]
async fn me(
    State(state): State<AppState>,
    CurrentUserId(user_id): CurrentUserId,
) -> AppResult<Json<MeResponse>> {
    let user = state.auth.current_user(user_id).await?;
    Ok(Json(MeResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = AUTH_TAG,
    responses((status = 200, description = "Cookie cleared", body = StatusResponse))
)]
async fn logout(jar: CookieJar) -> (CookieJar, Json<StatusResponse>) {
    // `CookieJar::remove` emits nothing when the request carried no cookie.
    let mut expired = access_token_cookie(String::new());
    expired.make_removal();
    (jar.add(expired), Json(StatusResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_cookie_attributes() {
        let cookie = access_token_cookie("abc".to_string());
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), None);
    }

    #[tokio::test]
    async fn test_logout_always_expires_cookie() {
        let (jar, _) = logout(CookieJar::new()).await;
        let cookie = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(cookie.value(), "");
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
    }
}
