use serde::{Deserialize, Serialize};

/// How provider per-night charges turn into a room price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// per-night charge × exchange rate × nights
    #[default]
    TotalStay,
    /// Provider per-night charge as is, no conversion
    PerNight,
}

impl PricingMode {
    pub fn applies_rate(&self) -> bool {
        matches!(self, PricingMode::TotalStay)
    }

    pub fn applies_nights(&self) -> bool {
        matches!(self, PricingMode::TotalStay)
    }
}

/// Query parameters of the hotel detail endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelDetailsQuery {
    /// `YYYY-MM-DD` or RFC 3339
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    /// Target currency for room prices
    pub currency: Option<String>,
    /// Caller-supplied rate from the provider currency to `currency`;
    /// looked up when absent
    pub exchange_rate: Option<String>,
    pub adults: Option<u32>,
    pub rooms: Option<u32>,
    #[serde(default)]
    pub pricing: PricingMode,
}
