use serde::{Deserialize, Serialize};

use crate::domain::a001_hotel::{HotelAddress, HotelDto};
use crate::domain::a002_room::RoomDto;
use crate::shared::validation::{is_blank, is_valid_time};
use crate::shared::wizard::{
    FormFieldError, FormFields, FormFieldsWriter, StepError, WizardForm,
};

pub const STEP_BASIC_INFO: usize = 0;
pub const STEP_LOCATION: usize = 1;
pub const STEP_ROOMS: usize = 2;
pub const STEP_AMENITIES: usize = 3;
pub const STEP_PHOTOS: usize = 4;

pub const MIN_DESCRIPTION_LEN: usize = 20;
pub const MAX_IMAGES: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Hotel,
    Apartment,
    Resort,
    Villa,
    GuestHouse,
}

impl PropertyType {
    pub fn code(&self) -> &'static str {
        match self {
            PropertyType::Hotel => "hotel",
            PropertyType::Apartment => "apartment",
            PropertyType::Resort => "resort",
            PropertyType::Villa => "villa",
            PropertyType::GuestHouse => "guest_house",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel" => Ok(PropertyType::Hotel),
            "apartment" => Ok(PropertyType::Apartment),
            "resort" => Ok(PropertyType::Resort),
            "villa" => Ok(PropertyType::Villa),
            "guest_house" => Ok(PropertyType::GuestHouse),
            other => Err(format!("unknown property type `{}`", other)),
        }
    }
}

/// One room type entered on the rooms step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    pub room_type: String,
    #[serde(default)]
    pub description: String,
    pub max_occupancy: u32,
    #[serde(default)]
    pub bed_configuration: Vec<String>,
    #[serde(default)]
    pub room_size: Option<f64>,
    #[serde(default)]
    pub room_size_unit: String,
    pub base_price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub quantity: u32,
    #[serde(default)]
    pub smoking_allowed: bool,
}

/// Property listing form (five-step wizard)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyListingForm {
    pub name: String,
    pub property_type: PropertyType,
    pub description: String,
    pub star_rating: u8,

    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,

    pub rooms: Vec<RoomDraft>,

    pub amenities: Vec<String>,
    pub tags: Vec<String>,
    pub check_in_time: String,
    pub check_out_time: String,

    pub images: Vec<String>,
}

impl PropertyListingForm {
    fn validate_basic_info(&self) -> Result<(), StepError> {
        if is_blank(&self.name) {
            return Err(Self::step_error(STEP_BASIC_INFO, "name", "Property name is required"));
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            return Err(Self::step_error(
                STEP_BASIC_INFO,
                "description",
                format!("Description must be at least {} characters", MIN_DESCRIPTION_LEN),
            ));
        }
        if !(1..=5).contains(&self.star_rating) {
            return Err(Self::step_error(
                STEP_BASIC_INFO,
                "star_rating",
                "Star rating must be between 1 and 5",
            ));
        }
        Ok(())
    }

    fn validate_location(&self) -> Result<(), StepError> {
        for (field, value, label) in [
            ("street", &self.street, "Street"),
            ("city", &self.city, "City"),
            ("country", &self.country, "Country"),
        ] {
            if is_blank(value) {
                return Err(Self::step_error(
                    STEP_LOCATION,
                    field,
                    format!("{} is required", label),
                ));
            }
        }
        Ok(())
    }

    fn validate_rooms(&self) -> Result<(), StepError> {
        if self.rooms.is_empty() {
            return Err(Self::step_error(STEP_ROOMS, "rooms", "Add at least one room type"));
        }
        for (i, room) in self.rooms.iter().enumerate() {
            let n = i + 1;
            if is_blank(&room.room_type) {
                return Err(Self::step_error(
                    STEP_ROOMS,
                    "rooms",
                    format!("Room {}: room type is required", n),
                ));
            }
            if room.max_occupancy == 0 {
                return Err(Self::step_error(
                    STEP_ROOMS,
                    "rooms",
                    format!("Room {}: max occupancy must be at least 1", n),
                ));
            }
            if !(room.base_price > 0.0) {
                return Err(Self::step_error(
                    STEP_ROOMS,
                    "rooms",
                    format!("Room {}: base price must be positive", n),
                ));
            }
            if let Some(discounted) = room.discounted_price {
                if discounted < 0.0 || discounted > room.base_price {
                    return Err(Self::step_error(
                        STEP_ROOMS,
                        "rooms",
                        format!("Room {}: discounted price cannot exceed base price", n),
                    ));
                }
            }
            if room.quantity == 0 {
                return Err(Self::step_error(
                    STEP_ROOMS,
                    "rooms",
                    format!("Room {}: quantity must be at least 1", n),
                ));
            }
        }
        Ok(())
    }

    fn validate_amenities(&self) -> Result<(), StepError> {
        if !is_valid_time(&self.check_in_time) {
            return Err(Self::step_error(
                STEP_AMENITIES,
                "check_in_time",
                "Check-in time must be HH:MM",
            ));
        }
        if !is_valid_time(&self.check_out_time) {
            return Err(Self::step_error(
                STEP_AMENITIES,
                "check_out_time",
                "Check-out time must be HH:MM",
            ));
        }
        Ok(())
    }

    fn validate_photos(&self) -> Result<(), StepError> {
        if self.images.is_empty() {
            return Err(Self::step_error(STEP_PHOTOS, "images", "Upload at least one photo"));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(Self::step_error(
                STEP_PHOTOS,
                "images",
                format!("At most {} photos are allowed", MAX_IMAGES),
            ));
        }
        Ok(())
    }

    pub fn to_hotel_dto(&self) -> HotelDto {
        HotelDto {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            address: HotelAddress {
                street: self.street.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                country: self.country.clone(),
                zip_code: self.zip_code.clone(),
            },
            star_rating: f32::from(self.star_rating),
            check_in_time: self.check_in_time.clone(),
            check_out_time: self.check_out_time.clone(),
            amenities: self.amenities.clone(),
            images: self.images.clone(),
            tags: {
                let mut tags = self.tags.clone();
                let type_tag = self.property_type.code().to_string();
                if !tags.contains(&type_tag) {
                    tags.push(type_tag);
                }
                tags
            },
        }
    }

    pub fn to_room_dtos(&self, hotel_id: &str) -> Vec<RoomDto> {
        self.rooms
            .iter()
            .map(|r| RoomDto {
                id: None,
                hotel_id: hotel_id.to_string(),
                room_type: r.room_type.clone(),
                description: r.description.clone(),
                max_occupancy: r.max_occupancy,
                bed_configuration: r.bed_configuration.clone(),
                room_size: r.room_size,
                room_size_unit: r.room_size_unit.clone(),
                base_price: r.base_price,
                discounted_price: r.discounted_price,
                amenities: r.amenities.clone(),
                images: Vec::new(),
                quantity: r.quantity,
                smoking_allowed: r.smoking_allowed,
            })
            .collect()
    }
}

impl WizardForm for PropertyListingForm {
    fn steps() -> &'static [&'static str] {
        &[
            "Basic information",
            "Location",
            "Rooms",
            "Amenities & policies",
            "Photos",
        ]
    }

    fn validate_step(&self, step: usize) -> Result<(), StepError> {
        match step {
            STEP_BASIC_INFO => self.validate_basic_info(),
            STEP_LOCATION => self.validate_location(),
            STEP_ROOMS => self.validate_rooms(),
            STEP_AMENITIES => self.validate_amenities(),
            STEP_PHOTOS => self.validate_photos(),
            _ => Ok(()),
        }
    }

    /// Photos are not text fields: they travel as `images` file parts
    fn to_form_fields(&self) -> Vec<(String, String)> {
        FormFieldsWriter::new()
            .text("name", &self.name)
            .text("property_type", self.property_type.code())
            .text("description", &self.description)
            .text("star_rating", self.star_rating)
            .text("street", &self.street)
            .text("city", &self.city)
            .text("state", &self.state)
            .text("country", &self.country)
            .text("zip_code", &self.zip_code)
            .json("rooms", &self.rooms)
            .json("amenities", &self.amenities)
            .json("tags", &self.tags)
            .text("check_in_time", &self.check_in_time)
            .text("check_out_time", &self.check_out_time)
            .finish()
    }

    fn from_form_fields(fields: &[(String, String)]) -> Result<Self, FormFieldError> {
        let f = FormFields::new(fields);
        Ok(Self {
            name: f.text("name"),
            property_type: f.parsed("property_type")?.unwrap_or_default(),
            description: f.text("description"),
            star_rating: f.number("star_rating")?,
            street: f.text("street"),
            city: f.text("city"),
            state: f.text("state"),
            country: f.text("country"),
            zip_code: f.text("zip_code"),
            rooms: f.json("rooms")?,
            amenities: f.json("amenities")?,
            tags: f.json("tags")?,
            check_in_time: f.text("check_in_time"),
            check_out_time: f.text("check_out_time"),
            images: Vec::new(),
        })
    }
}
