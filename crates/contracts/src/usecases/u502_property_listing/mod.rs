pub mod form;
pub mod response;

pub use form::{PropertyListingForm, PropertyType, RoomDraft};
pub use response::PublishedListing;
