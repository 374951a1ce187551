use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::validation::is_blank;

/// Upper bound of the review scale (provider scores are out of 10)
pub const MAX_RATING: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub hotel_id: String,
    pub reviewer_name: String,
    pub rating: f32,
    pub title: String,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
    pub data_by_api: bool,
}

impl Review {
    pub fn new_for_insert(dto: ReviewDto) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            hotel_id: dto.hotel_id,
            reviewer_name: dto.reviewer_name.trim().to_string(),
            rating: dto.rating,
            title: dto.title.trim().to_string(),
            comment: dto.comment,
            created_at: Some(Utc::now()),
            data_by_api: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.hotel_id) {
            return Err("Review must belong to a hotel".into());
        }
        if is_blank(&self.reviewer_name) {
            return Err("Reviewer name must not be empty".into());
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(format!("Rating must be between 0 and {}", MAX_RATING));
        }
        Ok(())
    }
}

/// Average rating rounded to one decimal, `None` for no reviews
pub fn average_rating(reviews: &[Review]) -> Option<f32> {
    if reviews.is_empty() {
        return None;
    }
    let sum: f32 = reviews.iter().map(|r| r.rating).sum();
    Some((sum / reviews.len() as f32 * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub hotel_id: String,
    pub reviewer_name: String,
    pub rating: f32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}
