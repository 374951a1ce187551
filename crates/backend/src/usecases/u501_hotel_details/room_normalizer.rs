//! Provider room groups → catalog rooms.
//!
//! The provider returns `roomGroups[].rooms[]` with per-night charges in its own
//! currency. Rooms are flattened, priced for the requested stay and reduced to
//! one room per `(room_type, smoking_allowed)`; the first one seen wins.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a002_room::Room;
use contracts::usecases::u501_hotel_details::PricingMode;
use serde_json::Value;
use std::collections::HashSet;

use crate::shared::format::round_money;
use crate::shared::providers::hotel_provider::models::{
    expect_object, field, image_urls, list_field, names, payload_data, value_to_id,
};

const MS_PER_DAY: i64 = 86_400_000;

/// Everything the price formula depends on besides the provider charge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingContext {
    pub exchange_rate: f64,
    pub nights: i64,
    pub mode: PricingMode,
}

impl PricingContext {
    /// Apply the pricing mode to one per-night charge, rounded to cents
    pub fn price(&self, per_night: f64) -> f64 {
        let mut total = per_night;
        if self.mode.applies_rate() {
            total *= self.exchange_rate;
        }
        if self.mode.applies_nights() {
            total *= self.nights.max(0) as f64;
        }
        round_money(total)
    }
}

/// Parse an exchange rate that arrives as text
pub fn parse_exchange_rate(raw: &str) -> Result<f64> {
    let rate: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Exchange rate '{}' is not a number", raw))?;
    if !rate.is_finite() || rate <= 0.0 {
        bail!("Exchange rate must be positive, got {}", rate);
    }
    Ok(rate)
}

/// `YYYY-MM-DD` is read as UTC midnight
pub(crate) fn parse_stay_instant(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid stay date '{}'", raw))
}

/// Whole nights between check-in and check-out, rounded up.
/// A check-out before check-in gives 0.
pub fn number_of_nights(checkin: &str, checkout: &str) -> Result<i64> {
    let checkin = parse_stay_instant(checkin)?;
    let checkout = parse_stay_instant(checkout)?;
    let ms = (checkout - checkin).num_milliseconds();
    if ms <= 0 {
        return Ok(0);
    }
    Ok((ms + MS_PER_DAY - 1) / MS_PER_DAY)
}

/// Provider room group; field spellings vary between payloads
#[derive(Debug, Default)]
struct ProviderRoomGroup {
    room_name: Option<String>,
    images: Vec<Value>,
    features: Vec<Value>,
    rooms: Vec<Value>,
}

impl ProviderRoomGroup {
    fn from_value(value: &Value) -> Result<Self> {
        let obj = expect_object(value)?;
        Ok(Self {
            room_name: field(obj, &["roomName", "masterRoomName", "name"])?,
            images: list_field(obj, &["images"])?,
            features: list_field(obj, &["features", "facilities"])?,
            rooms: list_field(obj, &["rooms"])?,
        })
    }
}

#[derive(Debug, Default)]
struct ProviderRoomPricing {
    per_night_all_inclusive_charge: Option<f64>,
    per_night_discounted_charge: Option<f64>,
}

impl ProviderRoomPricing {
    fn from_value(value: &Value) -> Result<Self> {
        let obj = expect_object(value)?;
        Ok(Self {
            per_night_all_inclusive_charge: field(
                obj,
                &["perNightAllInclusiveCharge", "perNight"],
            )?,
            per_night_discounted_charge: field(obj, &["perNightDiscountedCharge"])?,
        })
    }
}

#[derive(Debug, Default)]
struct ProviderRoom {
    room_id: Option<Value>,
    room_type: Option<String>,
    description: Option<String>,
    max_occupancy: Option<u32>,
    bed_configuration: Vec<Value>,
    room_size: Option<f64>,
    room_size_unit: Option<String>,
    smoking_allowed: Option<bool>,
    quantity: Option<u32>,
    amenities: Vec<Value>,
    images: Vec<Value>,
    per_night_all_inclusive_charge: Option<f64>,
    per_night_discounted_charge: Option<f64>,
    pricing: Option<ProviderRoomPricing>,
}

impl ProviderRoom {
    fn from_value(value: &Value) -> Result<Self> {
        let obj = expect_object(value)?;
        let pricing = match field::<Value>(obj, &["pricing"])? {
            Some(pricing) => {
                Some(ProviderRoomPricing::from_value(&pricing).context("field `pricing`")?)
            }
            None => None,
        };
        Ok(Self {
            room_id: field(obj, &["roomId", "id"])?,
            room_type: field(obj, &["roomType", "roomName", "name"])?,
            description: field(obj, &["description"])?,
            max_occupancy: field(obj, &["maxOccupancy", "occupancy", "maxOccupants"])?,
            bed_configuration: list_field(obj, &["bedConfiguration", "beds"])?,
            room_size: field(obj, &["roomSize", "size"])?,
            room_size_unit: field(obj, &["roomSizeUnit", "sizeUnit"])?,
            smoking_allowed: field(obj, &["smokingAllowed", "isSmoking", "smoking"])?,
            quantity: field(obj, &["quantity", "remainingRooms", "availableRooms"])?,
            amenities: list_field(obj, &["amenities", "benefits"])?,
            images: list_field(obj, &["images"])?,
            per_night_all_inclusive_charge: field(obj, &["perNightAllInclusiveCharge"])?,
            per_night_discounted_charge: field(obj, &["perNightDiscountedCharge"])?,
            pricing,
        })
    }

    fn per_night_charge(&self) -> Option<f64> {
        self.per_night_all_inclusive_charge
            .or_else(|| {
                self.pricing
                    .as_ref()
                    .and_then(|p| p.per_night_all_inclusive_charge)
            })
            .filter(|c| c.is_finite() && *c >= 0.0)
    }

    fn per_night_discounted(&self) -> Option<f64> {
        self.per_night_discounted_charge
            .or_else(|| {
                self.pricing
                    .as_ref()
                    .and_then(|p| p.per_night_discounted_charge)
            })
            .filter(|c| c.is_finite() && *c >= 0.0)
    }
}

fn room_groups(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .get("roomGroups")
        .or_else(|| payload_data(payload).get("roomGroups"))
        .and_then(Value::as_array)
}

/// Flatten provider room groups into priced, deduplicated rooms.
///
/// A payload without `roomGroups` gives an empty list. Malformed groups and
/// rooms without a charge are skipped.
pub fn normalize_room_groups(payload: &Value, hotel_id: &str, ctx: &PricingContext) -> Vec<Room> {
    let Some(groups) = room_groups(payload) else {
        tracing::debug!("Provider payload for hotel {} has no roomGroups", hotel_id);
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut rooms = Vec::new();

    for (group_idx, group_value) in groups.iter().enumerate() {
        let group = match ProviderRoomGroup::from_value(group_value) {
            Ok(group) => group,
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed room group #{} of hotel {}: {:#}",
                    group_idx,
                    hotel_id,
                    e
                );
                continue;
            }
        };

        for (room_idx, room_value) in group.rooms.iter().enumerate() {
            let raw = match ProviderRoom::from_value(room_value) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed room {}/{} of hotel {}: {:#}",
                        group_idx,
                        room_idx,
                        hotel_id,
                        e
                    );
                    continue;
                }
            };

            let Some(room) = build_room(&raw, &group, hotel_id, group_idx, room_idx, ctx) else {
                continue;
            };

            let key = room.dedup_key();
            if !seen.insert(key.clone()) {
                tracing::debug!("Dropping duplicate room {} of hotel {}", key, hotel_id);
                continue;
            }

            tracing::debug!(
                "Room {} [{}]: base {} discounted {} ({} nights, rate {}, {:?})",
                room.id,
                key,
                room.base_price,
                room.discounted_price,
                ctx.nights,
                ctx.exchange_rate,
                ctx.mode
            );
            rooms.push(room);
        }
    }

    rooms
}

fn build_room(
    raw: &ProviderRoom,
    group: &ProviderRoomGroup,
    hotel_id: &str,
    group_idx: usize,
    room_idx: usize,
    ctx: &PricingContext,
) -> Option<Room> {
    let room_type = raw
        .room_type
        .as_deref()
        .or(group.room_name.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())?
        .to_string();

    let Some(per_night) = raw.per_night_charge() else {
        tracing::warn!(
            "Room '{}' of hotel {} has no per-night charge, skipped",
            room_type,
            hotel_id
        );
        return None;
    };

    let base_price = ctx.price(per_night);
    let discounted_price = raw
        .per_night_discounted()
        .map(|d| ctx.price(d).min(base_price))
        .unwrap_or(base_price);

    let smoking_allowed = raw.smoking_allowed.unwrap_or(false);
    let images = if raw.images.is_empty() {
        image_urls(&group.images)
    } else {
        image_urls(&raw.images)
    };
    let amenities = if raw.amenities.is_empty() {
        names(&group.features)
    } else {
        names(&raw.amenities)
    };

    Some(Room {
        id: raw
            .room_id
            .as_ref()
            .and_then(value_to_id)
            .unwrap_or_else(|| format!("{}-{}-{}", hotel_id, group_idx, room_idx)),
        hotel_id: hotel_id.to_string(),
        description: raw.description.clone().unwrap_or_default(),
        max_occupancy: raw.max_occupancy.unwrap_or(1).max(1),
        bed_configuration: names(&raw.bed_configuration),
        room_size: raw.room_size.filter(|s| *s > 0.0),
        room_size_unit: raw.room_size_unit.clone().unwrap_or_default(),
        base_price,
        discounted_price,
        amenities,
        images,
        quantity: raw.quantity.unwrap_or(1),
        smoking_allowed,
        metadata: None,
        room_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_room::dedup_key;
    use serde_json::json;

    fn total_stay(rate: f64, nights: i64) -> PricingContext {
        PricingContext {
            exchange_rate: rate,
            nights,
            mode: PricingMode::TotalStay,
        }
    }

    #[test]
    fn test_duplicate_key_keeps_first_room() {
        let payload = json!({
            "roomGroups": [
                { "rooms": [{ "roomId": "a", "roomType": "Deluxe King", "smokingAllowed": false, "perNightAllInclusiveCharge": 120.0 }] },
                { "rooms": [{ "roomId": "b", "roomType": "Deluxe King", "smokingAllowed": false, "perNightAllInclusiveCharge": 90.0 }] }
            ]
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(1.0, 1));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "a");
        assert_eq!(rooms[0].base_price, 120.0);
    }

    #[test]
    fn test_smoking_flag_is_part_of_key() {
        let payload = json!({
            "data": {
                "roomGroups": [{
                    "roomName": "Twin",
                    "rooms": [
                        { "smokingAllowed": false, "perNightAllInclusiveCharge": 50 },
                        { "smokingAllowed": true, "perNightAllInclusiveCharge": 45 }
                    ]
                }]
            }
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(1.0, 2));
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].room_type, "Twin");
        assert_eq!(rooms[0].id, "h1-0-0");
        assert_eq!(rooms[1].dedup_key(), dedup_key("Twin", true));
        assert_eq!(rooms[1].base_price, 90.0);
    }

    #[test]
    fn test_missing_room_groups_is_empty() {
        let ctx = total_stay(1.0, 1);
        assert!(normalize_room_groups(&json!({}), "h1", &ctx).is_empty());
        assert!(normalize_room_groups(&json!({ "data": {} }), "h1", &ctx).is_empty());
        assert!(normalize_room_groups(&json!("oops"), "h1", &ctx).is_empty());
        assert!(normalize_room_groups(&json!({ "roomGroups": null }), "h1", &ctx).is_empty());
    }

    #[test]
    fn test_malformed_group_is_skipped() {
        let payload = json!({
            "roomGroups": [
                { "rooms": "not a list" },
                42,
                { "rooms": [
                    { "roomType": "Suite", "perNightAllInclusiveCharge": "free" },
                    { "roomType": "Suite", "perNightAllInclusiveCharge": 300 },
                    { "roomType": "No price" }
                ] }
            ]
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(1.0, 1));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_type, "Suite");
        assert_eq!(rooms[0].base_price, 300.0);
    }

    #[test]
    fn test_price_modes_for_known_fixture() {
        let payload = json!({
            "roomGroups": [{ "rooms": [{ "roomType": "Std", "perNightAllInclusiveCharge": 100.0 }] }]
        });

        let total = normalize_room_groups(&payload, "h1", &total_stay(1.1, 3));
        assert_eq!(total[0].base_price, 330.0);

        let per_night = PricingContext {
            exchange_rate: 1.1,
            nights: 3,
            mode: PricingMode::PerNight,
        };
        let rooms = normalize_room_groups(&payload, "h1", &per_night);
        assert_eq!(rooms[0].base_price, 100.0);
    }

    #[test]
    fn test_same_day_stay_prices_zero() {
        let nights = number_of_nights("2025-03-10", "2025-03-10").unwrap();
        assert_eq!(nights, 0);
        assert_eq!(total_stay(1.0, nights).price(100.0), 0.0);
    }

    #[test]
    fn test_discounted_price_follows_same_formula() {
        let payload = json!({
            "roomGroups": [{ "rooms": [
                { "roomType": "A", "pricing": { "perNightAllInclusiveCharge": 100.0, "perNightDiscountedCharge": 80.0 } },
                { "roomType": "B", "perNightAllInclusiveCharge": 100.0 }
            ] }]
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(2.0, 2));
        assert_eq!(rooms[0].base_price, 400.0);
        assert_eq!(rooms[0].discounted_price, 320.0);
        assert_eq!(rooms[1].discounted_price, rooms[1].base_price);
    }

    #[test]
    fn test_room_details_fall_back_to_group() {
        let payload = json!({
            "roomGroups": [{
                "masterRoomName": "Family Room",
                "images": ["//img.example.com/family.jpg"],
                "facilities": [{ "name": "Kitchenette" }],
                "rooms": [{
                    "perNightAllInclusiveCharge": 75,
                    "beds": ["2 Queen"],
                    "size": 35.0,
                    "sizeUnit": "m2",
                    "remainingRooms": 3,
                    "maxOccupancy": 4
                }]
            }]
        });

        let rooms = normalize_room_groups(&payload, "h9", &total_stay(1.0, 1));
        let room = &rooms[0];
        assert_eq!(room.room_type, "Family Room");
        assert_eq!(room.images, vec!["https://img.example.com/family.jpg"]);
        assert_eq!(room.amenities, vec!["Kitchenette"]);
        assert_eq!(room.bed_configuration, vec!["2 Queen"]);
        assert_eq!(room.room_size, Some(35.0));
        assert_eq!(room.quantity, 3);
        assert_eq!(room.max_occupancy, 4);
        assert!(room.metadata.is_none());
    }

    #[test]
    fn test_room_with_several_spellings_of_one_field() {
        let payload = json!({
            "roomGroups": [{
                "roomName": "Deluxe Group",
                "masterRoomName": "Deluxe Master",
                "rooms": [{
                    "id": 1,
                    "roomId": "r1",
                    "roomType": "Deluxe",
                    "roomName": "Deluxe Room",
                    "quantity": 2,
                    "remainingRooms": 5,
                    "perNightAllInclusiveCharge": 100,
                    "pricing": { "perNight": 90 }
                }]
            }]
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(1.0, 1));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "r1");
        assert_eq!(rooms[0].room_type, "Deluxe");
        assert_eq!(rooms[0].quantity, 2);
        assert_eq!(rooms[0].base_price, 100.0);
    }

    #[test]
    fn test_group_with_both_names_keeps_rooms() {
        let payload = json!({
            "roomGroups": [{
                "roomName": "Twin",
                "masterRoomName": "Twin Master",
                "features": ["Balcony"],
                "facilities": [{ "name": "Safe" }],
                "rooms": [{ "perNightAllInclusiveCharge": 60 }]
            }]
        });

        let rooms = normalize_room_groups(&payload, "h1", &total_stay(1.0, 1));
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_type, "Twin");
        assert_eq!(rooms[0].amenities, vec!["Balcony"]);
    }

    #[test]
    fn test_number_of_nights() {
        assert_eq!(number_of_nights("2025-03-10", "2025-03-11").unwrap(), 1);
        assert_eq!(number_of_nights("2025-03-10", "2025-03-14").unwrap(), 4);
        assert_eq!(
            number_of_nights("2025-03-10T14:00:00Z", "2025-03-11T12:00:00Z").unwrap(),
            1
        );
        assert_eq!(
            number_of_nights("2025-03-10T00:00:00Z", "2025-03-11T01:00:00Z").unwrap(),
            2
        );
        assert_eq!(number_of_nights("2025-03-14", "2025-03-10").unwrap(), 0);
        assert!(number_of_nights("tomorrow", "2025-03-10").is_err());
    }

    #[test]
    fn test_parse_exchange_rate() {
        assert_eq!(parse_exchange_rate(" 1.1 ").unwrap(), 1.1);
        assert!(parse_exchange_rate("abc").is_err());
        assert!(parse_exchange_rate("0").is_err());
        assert!(parse_exchange_rate("-2").is_err());
        assert!(parse_exchange_rate("NaN").is_err());
    }
}
