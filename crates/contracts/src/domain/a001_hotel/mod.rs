pub mod aggregate;

pub use aggregate::{Hotel, HotelAddress, HotelDto};
