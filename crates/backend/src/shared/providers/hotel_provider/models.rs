//! Provider JSON and its mapping into catalog types.
//!
//! The provider is loose about field names and nesting, and one record often
//! carries several spellings of the same field (`id` next to `propertyId`).
//! Each field is read from the first of its known keys that is present. A key
//! present with the wrong type makes the record unreadable; unreadable records
//! are skipped, never fatal.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a001_hotel::{Hotel, HotelAddress};
use contracts::domain::a003_review::Review;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Unwrap the `{ "data": ... }` envelope when present
pub fn payload_data(value: &Value) -> &Value {
    match value.get("data") {
        Some(data) if !data.is_null() => data,
        _ => value,
    }
}

/// Provider ids come as numbers or strings
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Records must be JSON objects
pub fn expect_object(value: &Value) -> Result<&Value> {
    if !value.is_object() {
        bail!("expected an object, got {}", value);
    }
    Ok(value)
}

/// Read a field from the first of `keys` that is present and not null
pub fn field<T: DeserializeOwned>(obj: &Value, keys: &[&str]) -> Result<Option<T>> {
    let found = keys
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)));
    let Some((key, value)) = found else {
        return Ok(None);
    };
    T::deserialize(value)
        .map(Some)
        .with_context(|| format!("field `{}`", key))
}

/// List field, empty when absent
pub fn list_field(obj: &Value, keys: &[&str]) -> Result<Vec<Value>> {
    Ok(field::<Vec<Value>>(obj, keys)?.unwrap_or_default())
}

/// `"Spa"` or `{ "name": "Spa" }`
pub fn named(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => field::<String>(value, &["name", "title"]).ok().flatten(),
        _ => None,
    };
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// `"//cdn/1.jpg"` or `{ "url": ... }`
pub fn image_url(value: &Value) -> Option<String> {
    let url = match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => field::<String>(value, &["url", "imageUrl", "link"])
            .ok()
            .flatten(),
        _ => None,
    };
    url.map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .map(|u| {
            // Provider CDN links are often protocol-relative
            if u.starts_with("//") {
                format!("https:{}", u)
            } else {
                u
            }
        })
}

/// Plain text or `{ "short": .., "long": .. }`, the long one preferred
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) => field::<String>(value, &["long"])
            .ok()
            .flatten()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| field::<String>(value, &["short"]).ok().flatten())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn names(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(named).collect()
}

pub fn image_urls(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(image_url).collect()
}

#[derive(Debug, Clone, Default)]
pub struct ProviderAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl ProviderAddress {
    /// Address object, or a single street line
    pub fn from_value(value: &Value) -> Result<Self> {
        if let Value::String(line) = value {
            return Ok(Self {
                street: Some(line.clone()),
                ..Default::default()
            });
        }
        let obj = expect_object(value)?;
        Ok(Self {
            street: field(obj, &["street", "address", "addressLine"])?,
            city: field(obj, &["city"])?,
            state: field(obj, &["state", "area", "region"])?,
            country: field(obj, &["country"])?,
            postal_code: field(obj, &["postalCode", "zipCode", "postCode"])?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProviderHotel {
    pub property_id: Option<Value>,
    pub name: Option<String>,
    pub description: Option<Value>,
    pub address: ProviderAddress,
    pub star_rating: Option<f32>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub amenities: Vec<Value>,
    pub images: Vec<Value>,
    pub tags: Vec<Value>,
}

impl ProviderHotel {
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = expect_object(value)?;
        let address = match field::<Value>(obj, &["address"])? {
            Some(address) => ProviderAddress::from_value(&address).context("field `address`")?,
            None => ProviderAddress::default(),
        };
        Ok(Self {
            property_id: field(obj, &["propertyId", "id", "hotelId"])?,
            name: field(obj, &["name", "propertyName", "hotelName"])?,
            description: field(obj, &["description"])?,
            address,
            star_rating: field(obj, &["starRating", "rating"])?,
            check_in_time: field(obj, &["checkInTime", "checkIn"])?,
            check_out_time: field(obj, &["checkOutTime", "checkOut"])?,
            amenities: list_field(obj, &["amenities", "facilities", "features"])?,
            images: list_field(obj, &["images"])?,
            tags: list_field(obj, &["tags"])?,
        })
    }
}

/// Map a provider hotel-details payload. `None` when it holds no hotel.
pub fn map_hotel(hotel_id: &str, payload: &Value) -> Option<Hotel> {
    let data = payload_data(payload);
    if !data.is_object() {
        return None;
    }
    let raw = match ProviderHotel::from_value(data) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Unreadable provider hotel {}: {:#}", hotel_id, e);
            return None;
        }
    };
    let name = raw.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
    let address = raw.address;

    Some(Hotel {
        id: raw
            .property_id
            .as_ref()
            .and_then(value_to_id)
            .unwrap_or_else(|| hotel_id.to_string()),
        name,
        description: raw.description.as_ref().map(text).unwrap_or_default(),
        address: HotelAddress {
            street: address.street.unwrap_or_default(),
            city: address.city.unwrap_or_default(),
            state: address.state.unwrap_or_default(),
            country: address.country.unwrap_or_default(),
            zip_code: address.postal_code.unwrap_or_default(),
        },
        star_rating: raw.star_rating.unwrap_or(0.0).clamp(0.0, 5.0),
        check_in_time: raw.check_in_time.unwrap_or_default(),
        check_out_time: raw.check_out_time.unwrap_or_default(),
        amenities: names(&raw.amenities),
        images: image_urls(&raw.images),
        tags: names(&raw.tags),
        data_by_api: true,
        metadata: None,
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProviderReview {
    pub review_id: Option<Value>,
    pub reviewer_name: Option<String>,
    pub rating: Option<f32>,
    pub review_title: Option<String>,
    pub review_comment: Option<String>,
    pub review_date: Option<String>,
}

impl ProviderReview {
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = expect_object(value)?;
        Ok(Self {
            review_id: field(obj, &["reviewId", "id", "hotelReviewId"])?,
            reviewer_name: field(obj, &["reviewerName", "reviewerDisplayName", "name"])?,
            rating: field(obj, &["rating", "score", "ratingValue"])?,
            review_title: field(obj, &["reviewTitle", "title"])?,
            review_comment: field(obj, &["reviewComment", "comment", "reviewComments"])?,
            review_date: field(obj, &["reviewDate", "date"])?,
        })
    }
}

fn parse_review_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        })
}

/// Map a provider reviews payload; unreadable entries are skipped
pub fn map_reviews(hotel_id: &str, payload: &Value) -> Vec<Review> {
    let data = payload_data(payload);
    let list = data
        .get("reviews")
        .or_else(|| data.get("comments"))
        .or(if data.is_array() { Some(data) } else { None })
        .and_then(Value::as_array);

    let Some(list) = list else {
        return Vec::new();
    };

    list.iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let raw = match ProviderReview::from_value(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Skipping unreadable provider review #{}: {:#}", i, e);
                    return None;
                }
            };
            Some(Review {
                id: raw
                    .review_id
                    .as_ref()
                    .and_then(value_to_id)
                    .unwrap_or_else(|| format!("{}-review-{}", hotel_id, i)),
                hotel_id: hotel_id.to_string(),
                reviewer_name: raw
                    .reviewer_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "Anonymous".to_string()),
                rating: raw.rating.unwrap_or(0.0).clamp(0.0, 10.0),
                title: raw.review_title.unwrap_or_default(),
                comment: raw.review_comment.unwrap_or_default(),
                created_at: raw.review_date.as_deref().and_then(parse_review_date),
                data_by_api: true,
            })
        })
        .collect()
}
