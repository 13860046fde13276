//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `room`, `hotel` - entity request bodies and listing queries
//! - `auth` - credentials and token responses
//! - `common` - acknowledgement bodies shared by every mutation
//! - `error` - error response body
//! - `pagination` - page/per_page query parameters

mod auth;
mod common;
mod error;
mod health;
mod hotel;
mod pagination;
mod room;

pub use auth::{CredentialsRequest, MeResponse, TokenResponse};
pub use common::{CreatedResponse, StatusResponse};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use hotel::{HotelAddRequest, HotelListParams, HotelPatchRequest};
pub use pagination::PaginationParams;
pub use room::{RoomAddRequest, RoomPatchRequest};
