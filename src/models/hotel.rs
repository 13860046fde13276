use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Queryable, Selectable, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Hotel {
    pub id: i32,
    pub title: String,
    pub location: String,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::hotels)]
pub struct NewHotel {
    pub title: String,
    pub location: String,
}

#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::hotels)]
pub struct ReplaceHotel {
    pub title: String,
    pub location: String,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::hotels)]
pub struct PatchHotel {
    pub title: Option<String>,
    pub location: Option<String>,
}
