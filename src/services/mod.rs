//! Service layer for logic that spans more than one repository call.

mod auth_service;

pub use auth_service::AuthService;
