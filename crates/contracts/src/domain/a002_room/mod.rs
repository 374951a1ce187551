pub mod aggregate;

pub use aggregate::{dedup_key, Room, RoomDto};
