use serde::{Deserialize, Serialize};

use crate::domain::common::EntityMetadata;
use crate::shared::validation::is_blank;

/// Hotel room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub room_type: String,
    pub description: String,
    pub max_occupancy: u32,
    pub bed_configuration: Vec<String>,
    pub room_size: Option<f64>,
    pub room_size_unit: String,
    pub base_price: f64,
    pub discounted_price: f64,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub quantity: u32,
    pub smoking_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntityMetadata>,
}

impl Room {
    pub fn new_for_insert(dto: RoomDto) -> Self {
        let mut room = Self {
            id: uuid::Uuid::new_v4().to_string(),
            hotel_id: String::new(),
            room_type: String::new(),
            description: String::new(),
            max_occupancy: 0,
            bed_configuration: Vec::new(),
            room_size: None,
            room_size_unit: String::new(),
            base_price: 0.0,
            discounted_price: 0.0,
            amenities: Vec::new(),
            images: Vec::new(),
            quantity: 0,
            smoking_allowed: false,
            metadata: Some(EntityMetadata::new()),
        };
        room.update(&dto);
        room
    }

    pub fn update(&mut self, dto: &RoomDto) {
        self.hotel_id = dto.hotel_id.clone();
        self.room_type = dto.room_type.trim().to_string();
        self.description = dto.description.clone();
        self.max_occupancy = dto.max_occupancy;
        self.bed_configuration = dto.bed_configuration.clone();
        self.room_size = dto.room_size;
        self.room_size_unit = dto.room_size_unit.clone();
        self.base_price = dto.base_price;
        self.discounted_price = dto.discounted_price.unwrap_or(dto.base_price);
        self.amenities = dto.amenities.clone();
        self.images = dto.images.clone();
        self.quantity = dto.quantity;
        self.smoking_allowed = dto.smoking_allowed;
    }

    /// Key under which provider rooms are deduplicated
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.room_type, self.smoking_allowed)
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.hotel_id) {
            return Err("Room must belong to a hotel".into());
        }
        if is_blank(&self.room_type) {
            return Err("Room type must not be empty".into());
        }
        if self.max_occupancy == 0 {
            return Err("Max occupancy must be at least 1".into());
        }
        if self.quantity == 0 {
            return Err("Quantity must be at least 1".into());
        }
        if !(self.base_price > 0.0) {
            return Err("Base price must be positive".into());
        }
        if self.discounted_price < 0.0 || self.discounted_price > self.base_price {
            return Err("Discounted price must be between 0 and the base price".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.touch();
        }
    }
}

pub fn dedup_key(room_type: &str, smoking_allowed: bool) -> String {
    format!("{}-{}", room_type, smoking_allowed)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: Option<String>,
    pub hotel_id: String,
    pub room_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub max_occupancy: u32,
    #[serde(default)]
    pub bed_configuration: Vec<String>,
    #[serde(default)]
    pub room_size: Option<f64>,
    #[serde(default)]
    pub room_size_unit: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub smoking_allowed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> RoomDto {
        RoomDto {
            hotel_id: "h-1".into(),
            room_type: "Deluxe King".into(),
            max_occupancy: 2,
            base_price: 120.0,
            quantity: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_discounted_price_defaults_to_base_price() {
        let room = Room::new_for_insert(dto());
        assert_eq!(room.discounted_price, 120.0);
        assert!(room.validate().is_ok());
    }

    #[test]
    fn test_dedup_key_combines_type_and_smoking_flag() {
        let mut room = Room::new_for_insert(dto());
        assert_eq!(room.dedup_key(), "Deluxe King-false");
        room.smoking_allowed = true;
        assert_eq!(room.dedup_key(), "Deluxe King-true");
    }

    #[test]
    fn test_validate_rejects_discount_above_base() {
        let mut d = dto();
        d.discounted_price = Some(150.0);
        assert!(Room::new_for_insert(d).validate().is_err());

        let mut d = dto();
        d.quantity = 0;
        assert!(Room::new_for_insert(d).validate().is_err());
    }
}
