use chrono::NaiveDate;

use crate::domain::a004_umrah_package::{MealPlan, UmrahPackageDto};
use crate::shared::validation::{is_blank, is_valid_currency};
use crate::shared::wizard::{
    FormFieldError, FormFields, FormFieldsWriter, StepError, WizardForm,
};

pub const STEP_DETAILS: usize = 0;
pub const STEP_DATES_PRICING: usize = 1;
pub const STEP_ACCOMMODATION: usize = 2;
pub const STEP_INCLUSIONS: usize = 3;
pub const STEP_PHOTOS: usize = 4;

/// Umrah package form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UmrahPackageForm {
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub departure_city: String,

    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
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

impl UmrahPackageForm {
    fn validate_details(&self) -> Result<(), StepError> {
        if is_blank(&self.title) {
            return Err(Self::step_error(STEP_DETAILS, "title", "Package title is required"));
        }
        if is_blank(&self.description) {
            return Err(Self::step_error(
                STEP_DETAILS,
                "description",
                "Description is required",
            ));
        }
        if self.duration_days == 0 {
            return Err(Self::step_error(
                STEP_DETAILS,
                "duration_days",
                "Duration must be at least one day",
            ));
        }
        if is_blank(&self.departure_city) {
            return Err(Self::step_error(
                STEP_DETAILS,
                "departure_city",
                "Departure city is required",
            ));
        }
        Ok(())
    }

    fn validate_dates_pricing(&self) -> Result<(), StepError> {
        let (departure, ret) = match (self.departure_date, self.return_date) {
            (Some(d), Some(r)) => (d, r),
            (None, _) => {
                return Err(Self::step_error(
                    STEP_DATES_PRICING,
                    "departure_date",
                    "Departure date is required",
                ))
            }
            (_, None) => {
                return Err(Self::step_error(
                    STEP_DATES_PRICING,
                    "return_date",
                    "Return date is required",
                ))
            }
        };
        if ret <= departure {
            return Err(Self::step_error(
                STEP_DATES_PRICING,
                "return_date",
                "Return date must be after departure date",
            ));
        }
        if !(self.price_per_person > 0.0) {
            return Err(Self::step_error(
                STEP_DATES_PRICING,
                "price_per_person",
                "Price per person must be positive",
            ));
        }
        if !is_valid_currency(&self.currency) {
            return Err(Self::step_error(
                STEP_DATES_PRICING,
                "currency",
                "Currency must be a three-letter code",
            ));
        }
        if self.seats == 0 {
            return Err(Self::step_error(
                STEP_DATES_PRICING,
                "seats",
                "At least one seat is required",
            ));
        }
        Ok(())
    }

    fn validate_accommodation(&self) -> Result<(), StepError> {
        if is_blank(&self.makkah_hotel) {
            return Err(Self::step_error(
                STEP_ACCOMMODATION,
                "makkah_hotel",
                "Makkah hotel is required",
            ));
        }
        if self.makkah_nights == 0 {
            return Err(Self::step_error(
                STEP_ACCOMMODATION,
                "makkah_nights",
                "At least one night in Makkah is required",
            ));
        }
        if self.madinah_nights > 0 && is_blank(&self.madinah_hotel) {
            return Err(Self::step_error(
                STEP_ACCOMMODATION,
                "madinah_hotel",
                "Madinah hotel is required when staying in Madinah",
            ));
        }
        if self.makkah_nights + self.madinah_nights > self.duration_days {
            return Err(Self::step_error(
                STEP_ACCOMMODATION,
                "makkah_nights",
                format!(
                    "Nights in Makkah and Madinah exceed the {}-day duration",
                    self.duration_days
                ),
            ));
        }
        Ok(())
    }

    fn validate_photos(&self) -> Result<(), StepError> {
        if self.images.is_empty() {
            return Err(Self::step_error(STEP_PHOTOS, "images", "Upload at least one photo"));
        }
        Ok(())
    }

    /// Only valid after `Wizard::validate_all` succeeded
    pub fn to_package_dto(&self) -> Option<UmrahPackageDto> {
        Some(UmrahPackageDto {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            duration_days: self.duration_days,
            departure_city: self.departure_city.trim().to_string(),
            departure_date: self.departure_date?,
            return_date: self.return_date?,
            price_per_person: self.price_per_person,
            currency: self.currency.clone(),
            seats: self.seats,
            makkah_hotel: self.makkah_hotel.clone(),
            makkah_nights: self.makkah_nights,
            madinah_hotel: self.madinah_hotel.clone(),
            madinah_nights: self.madinah_nights,
            visa_included: self.visa_included,
            flights_included: self.flights_included,
            transport_included: self.transport_included,
            meal_plan: self.meal_plan,
            inclusions: self.inclusions.clone(),
            images: self.images.clone(),
        })
    }
}

impl WizardForm for UmrahPackageForm {
    fn steps() -> &'static [&'static str] {
        &[
            "Package details",
            "Dates & pricing",
            "Accommodation",
            "Inclusions",
            "Photos",
        ]
    }

    fn validate_step(&self, step: usize) -> Result<(), StepError> {
        match step {
            STEP_DETAILS => self.validate_details(),
            STEP_DATES_PRICING => self.validate_dates_pricing(),
            STEP_ACCOMMODATION => self.validate_accommodation(),
            // Inclusions are all optional
            STEP_INCLUSIONS => Ok(()),
            STEP_PHOTOS => self.validate_photos(),
            _ => Ok(()),
        }
    }

    fn to_form_fields(&self) -> Vec<(String, String)> {
        FormFieldsWriter::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("duration_days", self.duration_days)
            .text("departure_city", &self.departure_city)
            .opt("departure_date", self.departure_date)
            .opt("return_date", self.return_date)
            .text("price_per_person", self.price_per_person)
            .text("currency", &self.currency)
            .text("seats", self.seats)
            .text("makkah_hotel", &self.makkah_hotel)
            .text("makkah_nights", self.makkah_nights)
            .text("madinah_hotel", &self.madinah_hotel)
            .text("madinah_nights", self.madinah_nights)
            .text("visa_included", self.visa_included)
            .text("flights_included", self.flights_included)
            .text("transport_included", self.transport_included)
            .text("meal_plan", self.meal_plan.code())
            .json("inclusions", &self.inclusions)
            .finish()
    }

    fn from_form_fields(fields: &[(String, String)]) -> Result<Self, FormFieldError> {
        let f = FormFields::new(fields);
        Ok(Self {
            title: f.text("title"),
            description: f.text("description"),
            duration_days: f.number("duration_days")?,
            departure_city: f.text("departure_city"),
            departure_date: f.parsed("departure_date")?,
            return_date: f.parsed("return_date")?,
            price_per_person: f.number("price_per_person")?,
            currency: f.text("currency").to_uppercase(),
            seats: f.number("seats")?,
            makkah_hotel: f.text("makkah_hotel"),
            makkah_nights: f.number("makkah_nights")?,
            madinah_hotel: f.text("madinah_hotel"),
            madinah_nights: f.number("madinah_nights")?,
            visa_included: f.flag("visa_included")?,
            flights_included: f.flag("flights_included")?,
            transport_included: f.flag("transport_included")?,
            meal_plan: f.parsed("meal_plan")?.unwrap_or_default(),
            inclusions: f.json("inclusions")?,
            images: Vec::new(),
        })
    }
}
