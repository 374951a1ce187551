use serde::{Deserialize, Serialize};

use super::request::PricingMode;
use crate::domain::a001_hotel::Hotel;
use crate::domain::a002_room::Room;
use crate::domain::a003_review::Review;
use crate::domain::common::Origin;

/// Outcome of loading one resource of the detail page.
///
/// Resources load independently: a failed one carries its message and can be
/// retried through its own endpoint while the others stay loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResourceState<T> {
    Loaded { data: T, source: Origin },
    Failed { error: String },
}

impl<T> ResourceState<T> {
    pub fn loaded(data: T, source: Origin) -> Self {
        ResourceState::Loaded { data, source }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ResourceState::Failed {
            error: error.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ResourceState::Loaded { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ResourceState::Loaded { data, .. } => Some(data),
            ResourceState::Failed { .. } => None,
        }
    }

    pub fn source(&self) -> Option<Origin> {
        match self {
            ResourceState::Loaded { source, .. } => Some(*source),
            ResourceState::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResourceState::Loaded { .. } => None,
            ResourceState::Failed { error } => Some(error),
        }
    }
}

/// Rooms with the pricing context they were computed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    pub rooms: Vec<Room>,
    pub currency: String,
    pub exchange_rate: f64,
    pub nights: i64,
    pub pricing: PricingMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailsResponse {
    pub hotel_id: String,
    pub hotel: ResourceState<Hotel>,
    pub rooms: ResourceState<RoomAvailability>,
    pub reviews: ResourceState<Vec<Review>>,
}
