//! Room request bodies.
//!
//! The hotel id always comes from the path, never from the body.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewRoom, PatchRoom};

/// Full room payload used by POST and PUT.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RoomAddRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Deluxe double", min_length = 1, max_length = 100)]
    pub name: String,
    /// Omitted or null clears the description on PUT
    #[schema(example = "Sea view, king-size bed")]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[schema(example = 100, minimum = 0)]
    pub price: i32,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 3, minimum = 0)]
    pub quantity: i32,
}

impl RoomAddRequest {
    pub fn into_new_room(self, hotel_id: i32) -> NewRoom {
        NewRoom {
            hotel_id,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Any subset of room fields. An explicit `"description": null` clears it.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct RoomPatchRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Deluxe double")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[schema(example = 150)]
    pub price: Option<i32>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
}

impl From<RoomPatchRequest> for PatchRoom {
    fn from(req: RoomPatchRequest) -> Self {
        PatchRoom {
            name: req.name,
            description: req.description,
            price: req.price,
            quantity: req.quantity,
        }
    }
}

/// Marks a field that appeared in the body, even when its value is null.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
