pub mod aggregate;

pub use aggregate::{average_rating, Review, ReviewDto};
