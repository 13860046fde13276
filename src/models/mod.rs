mod hotel;
mod room;
mod user;

pub use hotel::{Hotel, NewHotel, PatchHotel, ReplaceHotel};
pub use room::{NewRoom, PatchRoom, ReplaceRoom, Room};
pub use user::{NewUser, User};
