//! Repository layer: one generic CRUD implementation, one table description per entity.

mod base;
mod hotels;
mod rooms;
mod users;

pub use base::{BaseRepository, Changes, Changeset, Editable, Entity, Window};
pub use hotels::{HotelFilter, HotelsRepository};
pub use rooms::{RoomFilter, RoomsRepository};
pub use users::{UserFilter, UsersRepository};
