use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewRoom, PatchRoom, ReplaceRoom, Room};
use crate::repositories::base::{BaseRepository, Changeset, Editable, Entity, Window};
use crate::schema::rooms;

pub type RoomsRepository<'c> = BaseRepository<'c, Room>;

type RoomPredicate = Box<dyn BoxableExpression<rooms::table, Pg, SqlType = Bool>>;

/// Equality filter over rooms; unset fields match anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoomFilter {
    pub id: Option<i32>,
    pub hotel_id: Option<i32>,
}

impl RoomFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn hotel_id(mut self, hotel_id: i32) -> Self {
        self.hotel_id = Some(hotel_id);
        self
    }

    /// `None` when no field is set.
    pub fn predicate(&self) -> Option<RoomPredicate> {
        let id = self.id.map(|v| Box::new(rooms::id.eq(v)) as RoomPredicate);
        let hotel_id = self
            .hotel_id
            .map(|v| Box::new(rooms::hotel_id.eq(v)) as RoomPredicate);

        [id, hotel_id]
            .into_iter()
            .flatten()
            .reduce(|acc, next| Box::new(acc.and(next)) as RoomPredicate)
    }
}

impl Changeset for PatchRoom {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

#[async_trait]
impl Entity for Room {
    const NAME: &'static str = "Room";

    type Filter = RoomFilter;
    type New = NewRoom;

    async fn select(
        conn: &mut AsyncPgConnection,
        filter: &RoomFilter,
        window: Option<Window>,
    ) -> QueryResult<Vec<Room>> {
        let mut query = rooms::table
            .select(Room::as_select())
            .order(rooms::id.asc())
            .into_boxed();
        if let Some(predicate) = filter.predicate() {
            query = query.filter(predicate);
        }
        if let Some(window) = window {
            query = query.limit(window.limit).offset(window.offset);
        }
        query.load(conn).await
    }

    async fn insert(conn: &mut AsyncPgConnection, record: NewRoom) -> QueryResult<Room> {
        diesel::insert_into(rooms::table)
            .values(&record)
            .returning(Room::as_returning())
            .get_result(conn)
            .await
    }

    async fn remove(conn: &mut AsyncPgConnection, filter: &RoomFilter) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::delete(rooms::table.filter(predicate))
                    .execute(conn)
                    .await
            }
            None => diesel::delete(rooms::table).execute(conn).await,
        }
    }
}

#[async_trait]
impl Editable for Room {
    type Replace = ReplaceRoom;
    type Patch = PatchRoom;

    async fn replace(
        conn: &mut AsyncPgConnection,
        changes: ReplaceRoom,
        filter: &RoomFilter,
    ) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::update(rooms::table.filter(predicate))
                    .set(&changes)
                    .execute(conn)
                    .await
            }
            None => diesel::update(rooms::table).set(&changes).execute(conn).await,
        }
    }

    async fn patch(
        conn: &mut AsyncPgConnection,
        changes: PatchRoom,
        filter: &RoomFilter,
    ) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::update(rooms::table.filter(predicate))
                    .set(&changes)
                    .execute(conn)
                    .await
            }
            None => diesel::update(rooms::table).set(&changes).execute(conn).await,
        }
    }
}
