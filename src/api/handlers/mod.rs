//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod hotels;
pub mod rooms;
