use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Room row as stored
#[derive(Debug, Queryable, Selectable, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Room {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: i32,
}

/// Fully specified room for INSERT; `hotel_id` comes from the request path
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::rooms)]
pub struct NewRoom {
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: i32,
}

/// Overwrites every column; a `None` description is written as NULL
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::rooms)]
#[diesel(treat_none_as_null = true)]
pub struct ReplaceRoom {
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: i32,
}

/// Only the `Some` fields are written.
///
/// `description: Some(None)` clears the column.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::rooms)]
pub struct PatchRoom {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl From<NewRoom> for ReplaceRoom {
    fn from(room: NewRoom) -> Self {
        Self {
            hotel_id: room.hotel_id,
            name: room.name,
            description: room.description,
            price: room.price,
            quantity: room.quantity,
        }
    }
}
