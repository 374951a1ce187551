use serde::{Deserialize, Serialize};

/// Result of publishing a property listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedListing {
    pub hotel_id: String,
    pub room_ids: Vec<String>,
    pub images: Vec<String>,
}
