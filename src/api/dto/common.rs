use serde::Serialize;
use utoipa::ToSchema;

/// `{"status": "ok"}` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Acknowledgement carrying the stored record.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse<T> {
    #[schema(example = "ok")]
    pub status: &'static str,
    pub data: T,
}

impl<T> CreatedResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: "ok", data }
    }
}
