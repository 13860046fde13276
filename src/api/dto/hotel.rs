//! Hotel request bodies and listing query.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::{DEFAULT_PER_PAGE, default_page};
use crate::models::{NewHotel, PatchHotel, ReplaceHotel};
use crate::repositories::{HotelFilter, Window};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct HotelAddRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    #[schema(example = "Grand Budapest", min_length = 1, max_length = 100)]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
    #[schema(example = "Zubrowka", min_length = 1, max_length = 255)]
    pub location: String,
}

impl From<HotelAddRequest> for NewHotel {
    fn from(req: HotelAddRequest) -> Self {
        NewHotel {
            title: req.title,
            location: req.location,
        }
    }
}

impl From<HotelAddRequest> for ReplaceHotel {
    fn from(req: HotelAddRequest) -> Self {
        ReplaceHotel {
            title: req.title,
            location: req.location,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct HotelPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Location must be between 1 and 255 characters"))]
    pub location: Option<String>,
}

impl From<HotelPatchRequest> for PatchHotel {
    fn from(req: HotelPatchRequest) -> Self {
        PatchHotel {
            title: req.title,
            location: req.location,
        }
    }
}

/// `GET /hotels` query: substring filters plus pagination.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct HotelListParams {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,
    #[validate(range(min = 1, max = 9, message = "Items per page must be between 1 and 9"))]
    #[param(minimum = 1, maximum = 9, example = 5)]
    pub per_page: Option<u32>,
}

impl HotelListParams {
    pub fn filter(&self) -> HotelFilter {
        HotelFilter {
            id: None,
            title: self.title.clone().filter(|t| !t.is_empty()),
            location: self.location.clone().filter(|l| !l.is_empty()),
        }
    }

    pub fn window(&self) -> Window {
        Window::page(self.page, self.per_page.unwrap_or(DEFAULT_PER_PAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_ignored() {
        let params = HotelListParams {
            title: Some(String::new()),
            location: Some("sea".to_string()),
            page: 2,
            per_page: None,
        };
        assert_eq!(params.filter(), HotelFilter::new().location("sea"));
        assert_eq!(params.window(), Window { limit: 5, offset: 5 });
    }

    #[test]
    fn test_empty_title_rejected() {
        let req = HotelAddRequest {
            title: String::new(),
            location: "Somewhere".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
