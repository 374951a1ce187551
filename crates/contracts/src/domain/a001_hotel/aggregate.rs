use serde::{Deserialize, Serialize};

use crate::domain::common::{EntityMetadata, Origin};
use crate::shared::validation::{is_blank, is_valid_time};

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
}

impl HotelAddress {
    /// "street, city, country" without the empty parts
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.country]
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.trim())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Hotel: a local record or one read from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// UUID for local rows, provider property id for API records
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: HotelAddress,
    pub star_rating: f32,
    pub check_in_time: String,
    pub check_out_time: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub data_by_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntityMetadata>,
}

impl Hotel {
    /// New local hotel from a DTO, with a fresh id
    pub fn new_for_insert(dto: HotelDto) -> Self {
        let mut hotel = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            description: String::new(),
            address: HotelAddress::default(),
            star_rating: 0.0,
            check_in_time: String::new(),
            check_out_time: String::new(),
            amenities: Vec::new(),
            images: Vec::new(),
            tags: Vec::new(),
            data_by_api: false,
            metadata: Some(EntityMetadata::new()),
        };
        hotel.update(&dto);
        hotel
    }

    pub fn update(&mut self, dto: &HotelDto) {
        self.name = dto.name.trim().to_string();
        self.description = dto.description.clone();
        self.address = dto.address.clone();
        self.star_rating = dto.star_rating;
        self.check_in_time = dto.check_in_time.clone();
        self.check_out_time = dto.check_out_time.clone();
        self.amenities = dto.amenities.clone();
        self.images = dto.images.clone();
        self.tags = dto.tags.clone();
    }

    pub fn origin(&self) -> Origin {
        if self.data_by_api {
            Origin::Provider
        } else {
            Origin::Local
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.name) {
            return Err("Hotel name must not be empty".into());
        }
        if !(0.0..=5.0).contains(&self.star_rating) {
            return Err("Star rating must be between 0 and 5".into());
        }
        if !self.check_in_time.is_empty() && !is_valid_time(&self.check_in_time) {
            return Err("Check-in time must be HH:MM".into());
        }
        if !self.check_out_time.is_empty() && !is_valid_time(&self.check_out_time) {
            return Err("Check-out time must be HH:MM".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.touch();
        }
    }

    /// Case-insensitive match against name, city and country
    pub fn matches_destination(&self, destination: &str) -> bool {
        let needle = destination.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.address.city, &self.address.country]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDto {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: HotelAddress,
    #[serde(default)]
    pub star_rating: f32,
    #[serde(default)]
    pub check_in_time: String,
    #[serde(default)]
    pub check_out_time: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> HotelDto {
        HotelDto {
            name: "  Dar Al Tawhid  ".into(),
            address: HotelAddress {
                city: "Makkah".into(),
                country: "Saudi Arabia".into(),
                ..Default::default()
            },
            star_rating: 5.0,
            check_in_time: "15:00".into(),
            check_out_time: "12:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_for_insert_is_local_and_trimmed() {
        let hotel = Hotel::new_for_insert(dto());
        assert_eq!(hotel.name, "Dar Al Tawhid");
        assert!(!hotel.data_by_api);
        assert_eq!(hotel.origin(), Origin::Local);
        assert!(uuid::Uuid::parse_str(&hotel.id).is_ok());
        assert!(hotel.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut hotel = Hotel::new_for_insert(dto());
        hotel.star_rating = 6.0;
        assert!(hotel.validate().is_err());

        let mut hotel = Hotel::new_for_insert(dto());
        hotel.check_in_time = "3pm".into();
        assert!(hotel.validate().is_err());

        let mut hotel = Hotel::new_for_insert(dto());
        hotel.name = " ".into();
        assert!(hotel.validate().is_err());
    }

    #[test]
    fn test_matches_destination() {
        let hotel = Hotel::new_for_insert(dto());
        assert!(hotel.matches_destination("makkah"));
        assert!(hotel.matches_destination("SAUDI"));
        assert!(hotel.matches_destination(""));
        assert!(!hotel.matches_destination("Madinah"));
        assert_eq!(hotel.address.one_line(), "Makkah, Saudi Arabia");
    }

    #[test]
    fn test_serializes_with_data_by_api_flag() {
        let hotel = Hotel::new_for_insert(dto());
        let json = serde_json::to_value(&hotel).unwrap();
        assert_eq!(json["dataByApi"], false);
        assert_eq!(json["starRating"], 5.0);
        assert_eq!(json["address"]["city"], "Makkah");
    }
}
