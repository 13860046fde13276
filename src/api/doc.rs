use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const ROOM_TAG: &str = "Rooms";
pub const HOTEL_TAG: &str = "Hotels";
pub const AUTH_TAG: &str = "Auth";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "booking-rs",
        description = "Hotel and room booking API",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = ROOM_TAG, description = "Rooms of a hotel"),
        (name = HOTEL_TAG, description = "Hotels and title/location search"),
        (name = AUTH_TAG, description = "Registration and cookie sessions"),
        (name = HEALTH_TAG, description = "Liveness and readiness for orchestrators"),
    )
)]
pub struct ApiDoc;

/// Registers the `access_token` cookie as the `cookieAuth` scheme.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let scheme = SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
            crate::api::middleware::ACCESS_TOKEN_COOKIE,
            "JWT issued by POST /auth/login",
        )));
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme("cookieAuth", scheme);
    }
}
