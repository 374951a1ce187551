//! Hotel search state carried in the URL query string.
//!
//! Every serialized filter carries `v`; readers reject versions they do not
//! know instead of guessing at field meanings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SEARCH_FILTER_VERSION: u32 = 1;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unsupported search filter version {0}")]
    UnsupportedVersion(u32),

    #[error("malformed search filter: {0}")]
    Malformed(String),

    #[error("invalid search filter: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Query strings written before versioning existed have no `v`
    #[serde(rename = "v", default = "legacy_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout: Option<NaiveDate>,

    #[serde(default = "default_adults")]
    pub adults: u32,

    #[serde(default)]
    pub children: u32,

    #[serde(default = "default_rooms")]
    pub rooms: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stars: Option<u8>,

    #[serde(default)]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn legacy_version() -> u32 {
    1
}

fn default_adults() -> u32 {
    2
}

fn default_rooms() -> u32 {
    1
}

fn default_page_size() -> usize {
    20
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            version: SEARCH_FILTER_VERSION,
            destination: None,
            checkin: None,
            checkout: None,
            adults: default_adults(),
            children: 0,
            rooms: default_rooms(),
            currency: None,
            min_stars: None,
            page: 0,
            page_size: default_page_size(),
        }
    }
}

impl SearchFilter {
    /// Parse a raw query string (without the leading `?`)
    pub fn from_query_string(query: &str) -> Result<Self, FilterError> {
        let query = query.trim_start_matches('?');
        let filter: SearchFilter =
            serde_qs::from_str(query).map_err(|e| FilterError::Malformed(e.to_string()))?;
        if filter.version != SEARCH_FILTER_VERSION {
            return Err(FilterError::UnsupportedVersion(filter.version));
        }
        let filter = filter.normalized();
        filter.validate()?;
        Ok(filter)
    }

    pub fn to_query_string(&self) -> Result<String, FilterError> {
        let mut current = self.clone();
        current.version = SEARCH_FILTER_VERSION;
        serde_qs::to_string(&current).map_err(|e| FilterError::Malformed(e.to_string()))
    }

    /// Empty strings from HTML forms mean "not set"
    pub fn normalized(mut self) -> Self {
        self.destination = self
            .destination
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.currency = self
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.adults == 0 {
            return Err(FilterError::Invalid("at least one adult is required".into()));
        }
        if self.rooms == 0 {
            return Err(FilterError::Invalid("at least one room is required".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(FilterError::Invalid(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if let Some(stars) = self.min_stars {
            if stars > 5 {
                return Err(FilterError::Invalid("min_stars must be at most 5".into()));
            }
        }
        if let (Some(checkin), Some(checkout)) = (self.checkin, self.checkout) {
            if checkout <= checkin {
                return Err(FilterError::Invalid(
                    "checkout must be after checkin".into(),
                ));
            }
        }
        Ok(())
    }

    /// Nights between the search dates, if both are set
    pub fn nights(&self) -> Option<i64> {
        match (self.checkin, self.checkout) {
            (Some(checkin), Some(checkout)) => Some((checkout - checkin).num_days().max(0)),
            _ => None,
        }
    }

    pub fn guests(&self) -> u32 {
        self.adults + self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_survives_a_round_trip() {
        let filter = SearchFilter {
            destination: Some("Makkah".into()),
            checkin: NaiveDate::from_ymd_opt(2025, 3, 1),
            checkout: NaiveDate::from_ymd_opt(2025, 3, 4),
            currency: Some("SAR".into()),
            min_stars: Some(4),
            ..SearchFilter::default()
        };

        let query = filter.to_query_string().unwrap();
        assert!(query.contains("v=1"));
        let parsed = SearchFilter::from_query_string(&query).unwrap();
        assert_eq!(parsed, filter);
        assert_eq!(parsed.nights(), Some(3));
    }

    #[test]
    fn test_missing_version_reads_as_first_version() {
        let parsed = SearchFilter::from_query_string("destination=Jeddah&adults=1").unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.destination.as_deref(), Some("Jeddah"));
        assert_eq!(parsed.adults, 1);
        assert_eq!(parsed.rooms, 1);
        assert_eq!(parsed.page_size, 20);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let err = SearchFilter::from_query_string("v=2&destination=Jeddah").unwrap_err();
        assert_eq!(err, FilterError::UnsupportedVersion(2));
    }

    #[test]
    fn test_empty_fields_are_normalized_away() {
        let parsed = SearchFilter::from_query_string("?v=1&destination=&currency=usd").unwrap();
        assert_eq!(parsed.destination, None);
        assert_eq!(parsed.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_reversed_dates_are_invalid() {
        let err =
            SearchFilter::from_query_string("checkin=2025-03-04&checkout=2025-03-01").unwrap_err();
        assert!(matches!(err, FilterError::Invalid(_)));
    }

    #[test]
    fn test_page_size_is_bounded() {
        assert!(SearchFilter::from_query_string("page_size=0").is_err());
        assert!(SearchFilter::from_query_string("page_size=500").is_err());
        assert!(SearchFilter::from_query_string("page_size=50").is_ok());
    }
}
