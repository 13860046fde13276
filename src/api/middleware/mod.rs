//! Request pipeline pieces: request ids, request logging, error rendering
//! and the cookie authentication extractors.

mod auth;
mod error_handler;
mod logging;
mod request_id;

pub use auth::{ACCESS_TOKEN_COOKIE, AccessToken, CurrentUserId};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
