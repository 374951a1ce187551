use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::EntityMetadata;
use crate::shared::validation::{is_blank, is_valid_currency};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPlan {
    #[default]
    None,
    Breakfast,
    HalfBoard,
    FullBoard,
}

impl MealPlan {
    pub fn code(&self) -> &'static str {
        match self {
            MealPlan::None => "none",
            MealPlan::Breakfast => "breakfast",
            MealPlan::HalfBoard => "half_board",
            MealPlan::FullBoard => "full_board",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "none" => Some(MealPlan::None),
            "breakfast" => Some(MealPlan::Breakfast),
            "half_board" => Some(MealPlan::HalfBoard),
            "full_board" => Some(MealPlan::FullBoard),
            _ => None,
        }
    }
}

impl std::str::FromStr for MealPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealPlan::from_code(s).ok_or_else(|| format!("unknown meal plan `{}`", s))
    }
}

/// Umrah package tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmrahPackage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub departure_city: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price_per_person: f64,
    pub currency: String,
    pub seats: u32,
    pub makkah_hotel: String,
    pub makkah_nights: u32,
    pub madinah_hotel: String,
    pub madinah_nights: u32,
    pub visa_included: bool,
    pub flights_included: bool,
    pub transport_included: bool,
    pub meal_plan: MealPlan,
    pub inclusions: Vec<String>,
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntityMetadata>,
}

impl UmrahPackage {
    pub fn new_for_insert(dto: UmrahPackageDto) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: dto.title,
            description: dto.description,
            duration_days: dto.duration_days,
            departure_city: dto.departure_city,
            departure_date: dto.departure_date,
            return_date: dto.return_date,
            price_per_person: dto.price_per_person,
            currency: dto.currency.to_uppercase(),
            seats: dto.seats,
            makkah_hotel: dto.makkah_hotel,
            makkah_nights: dto.makkah_nights,
            madinah_hotel: dto.madinah_hotel,
            madinah_nights: dto.madinah_nights,
            visa_included: dto.visa_included,
            flights_included: dto.flights_included,
            transport_included: dto.transport_included,
            meal_plan: dto.meal_plan,
            inclusions: dto.inclusions,
            images: dto.images,
            metadata: Some(EntityMetadata::new()),
        }
    }

    /// Nights between departure and return
    pub fn total_nights(&self) -> i64 {
        (self.return_date - self.departure_date).num_days()
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.title) {
            return Err("Package title must not be empty".into());
        }
        if self.return_date <= self.departure_date {
            return Err("Return date must be after departure date".into());
        }
        if !(self.price_per_person > 0.0) {
            return Err("Price per person must be positive".into());
        }
        if !is_valid_currency(&self.currency) {
            return Err("Currency must be a three-letter code".into());
        }
        if self.seats == 0 {
            return Err("At least one seat is required".into());
        }
        if is_blank(&self.makkah_hotel) {
            return Err("Makkah hotel must not be empty".into());
        }
        if self.makkah_nights + self.madinah_nights > self.duration_days {
            return Err("Hotel nights exceed package duration".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.touch();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmrahPackageDto {
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub departure_city: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price_per_person: f64,
    pub currency: String,
    pub seats: u32,
    pub makkah_hotel: String,
    pub makkah_nights: u32,
    pub madinah_hotel: String,
    pub madinah_nights: u32,
    pub visa_included: bool,
    pub flights_included: bool,
    pub transport_included: bool,
    pub meal_plan: MealPlan,
    pub inclusions: Vec<String>,
    pub images: Vec<String>,
}
