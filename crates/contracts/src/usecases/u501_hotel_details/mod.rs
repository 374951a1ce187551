pub mod request;
pub mod response;

pub use request::{HotelDetailsQuery, PricingMode};
pub use response::{HotelDetailsResponse, ResourceState, RoomAvailability};
