//! Pagination query parameters.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::repositories::Window;

pub const DEFAULT_PER_PAGE: u32 = 5;

/// `?page=&per_page=` for listings.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Items per page, 5 when omitted
    #[validate(range(min = 1, max = 9, message = "Items per page must be between 1 and 9"))]
    #[param(minimum = 1, maximum = 9, example = 5)]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    pub fn window(&self) -> Window {
        Window::page(self.page, self.per_page.unwrap_or(DEFAULT_PER_PAGE))
    }
}

pub(crate) fn default_page() -> u32 {
    1
}
