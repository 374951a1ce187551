use super::room_normalizer::{
    normalize_room_groups, number_of_nights, parse_exchange_rate, parse_stay_instant,
    PricingContext,
};
use super::sources::{HotelProvider, LocalCatalog, RateSource};
use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use contracts::domain::a001_hotel::Hotel;
use contracts::domain::a003_review::Review;
use contracts::domain::common::Origin;
use contracts::usecases::u501_hotel_details::{
    HotelDetailsQuery, HotelDetailsResponse, PricingMode, ResourceState, RoomAvailability,
};
use std::sync::Arc;

use crate::shared::providers::hotel_provider::RoomSearch;
use crate::shared::providers::ProviderError;

const DEFAULT_ADULTS: u32 = 2;
const DEFAULT_ROOMS: u32 = 1;

/// Stay dates read from the query
#[derive(Debug, Clone, PartialEq)]
pub struct Stay {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub nights: i64,
}

/// Missing check-in is today, missing check-out is the day after check-in
pub fn resolve_stay(query: &HotelDetailsQuery, today: NaiveDate) -> Result<Stay> {
    let checkin_raw = query.checkin.as_deref().filter(|s| !s.trim().is_empty());
    let checkout_raw = query.checkout.as_deref().filter(|s| !s.trim().is_empty());

    let checkin = match checkin_raw {
        Some(raw) => parse_stay_instant(raw)?.date_naive(),
        None => today,
    };
    let checkout = match checkout_raw {
        Some(raw) => parse_stay_instant(raw)?.date_naive(),
        None => checkin
            .checked_add_days(Days::new(1))
            .ok_or_else(|| anyhow::anyhow!("Check-in date is out of range"))?,
    };

    let nights = match (checkin_raw, checkout_raw) {
        (Some(ci), Some(co)) => number_of_nights(ci, co)?,
        _ => number_of_nights(
            &checkin.format("%Y-%m-%d").to_string(),
            &checkout.format("%Y-%m-%d").to_string(),
        )?,
    };

    Ok(Stay {
        checkin,
        checkout,
        nights,
    })
}

/// Hotel page loader: hotel, rooms and reviews load concurrently and each
/// falls back to the provider on its own
pub struct HotelDetailsExecutor {
    local: Arc<dyn LocalCatalog>,
    provider: Arc<dyn HotelProvider>,
    rates: Arc<dyn RateSource>,
    catalog_currency: String,
}

impl HotelDetailsExecutor {
    pub fn new(
        local: Arc<dyn LocalCatalog>,
        provider: Arc<dyn HotelProvider>,
        rates: Arc<dyn RateSource>,
        catalog_currency: &str,
    ) -> Self {
        Self {
            local,
            provider,
            rates,
            catalog_currency: catalog_currency.to_uppercase(),
        }
    }

    /// All three resources at once; one failing never blocks the others
    pub async fn load(&self, hotel_id: &str, query: &HotelDetailsQuery) -> HotelDetailsResponse {
        tracing::info!("Loading hotel details for {}", hotel_id);

        let (hotel, rooms, reviews) = tokio::join!(
            self.load_hotel(hotel_id),
            self.load_rooms(hotel_id, query),
            self.load_reviews(hotel_id),
        );

        HotelDetailsResponse {
            hotel_id: hotel_id.to_string(),
            hotel,
            rooms,
            reviews,
        }
    }

    /// Local hotel, else the provider record
    pub async fn load_hotel(&self, hotel_id: &str) -> ResourceState<Hotel> {
        match self.local.hotel(hotel_id).await {
            Ok(Some(hotel)) => return ResourceState::loaded(hotel, Origin::Local),
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to load local hotel {}: {}", hotel_id, e);
                return ResourceState::failed(format!("Failed to load hotel: {}", e));
            }
        }

        match self.provider.hotel(hotel_id).await {
            Ok(Some(hotel)) => ResourceState::loaded(hotel, Origin::Provider),
            Ok(None) => ResourceState::failed(format!("Hotel {} not found", hotel_id)),
            Err(e) => {
                tracing::error!("Provider hotel {} failed: {}", hotel_id, e);
                ResourceState::failed(e.to_string())
            }
        }
    }

    /// Local rooms as stored, else provider availability priced for the stay.
    ///
    /// Stay dates only matter for provider pricing, so a bad date fails the
    /// provider lookup but never hides local rooms.
    pub async fn load_rooms(
        &self,
        hotel_id: &str,
        query: &HotelDetailsQuery,
    ) -> ResourceState<RoomAvailability> {
        let today = Utc::now().date_naive();

        match self.local.rooms(hotel_id).await {
            Ok(rooms) if !rooms.is_empty() => {
                let nights = match resolve_stay(query, today) {
                    Ok(stay) => stay.nights,
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring stay dates for local rooms of {}: {}",
                            hotel_id,
                            e
                        );
                        0
                    }
                };
                let availability = RoomAvailability {
                    rooms,
                    currency: self.catalog_currency.clone(),
                    exchange_rate: 1.0,
                    nights,
                    pricing: PricingMode::PerNight,
                };
                return ResourceState::loaded(availability, Origin::Local);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to load local rooms of {}: {}", hotel_id, e);
                return ResourceState::failed(format!("Failed to load rooms: {}", e));
            }
        }

        let stay = match resolve_stay(query, today) {
            Ok(stay) => stay,
            Err(e) => return ResourceState::failed(e.to_string()),
        };

        match self.provider_rooms(hotel_id, query, &stay).await {
            Ok(availability) => ResourceState::loaded(availability, Origin::Provider),
            Err(e) => {
                tracing::error!("Provider rooms of {} failed: {}", hotel_id, e);
                ResourceState::failed(e.to_string())
            }
        }
    }

    async fn provider_rooms(
        &self,
        hotel_id: &str,
        query: &HotelDetailsQuery,
        stay: &Stay,
    ) -> Result<RoomAvailability> {
        let (currency, exchange_rate) = self.pricing_rate(query).await?;

        let search = RoomSearch {
            checkin: stay.checkin,
            checkout: stay.checkout,
            adults: query.adults.unwrap_or(DEFAULT_ADULTS),
            rooms: query.rooms.unwrap_or(DEFAULT_ROOMS),
            currency: self.provider.currency().to_string(),
        };
        let payload = self.provider.room_availability(hotel_id, &search).await?;

        let ctx = PricingContext {
            exchange_rate,
            nights: stay.nights,
            mode: query.pricing,
        };
        let rooms = normalize_room_groups(&payload, hotel_id, &ctx);
        tracing::info!(
            "Hotel {}: {} provider rooms, {} nights, {} @ {}",
            hotel_id,
            rooms.len(),
            stay.nights,
            currency,
            exchange_rate
        );

        Ok(RoomAvailability {
            rooms,
            currency,
            exchange_rate,
            nights: stay.nights,
            pricing: query.pricing,
        })
    }

    /// Currency and rate the provider charges are converted with.
    ///
    /// A failed lookup keeps prices in the provider currency at rate 1.
    async fn pricing_rate(&self, query: &HotelDetailsQuery) -> Result<(String, f64)> {
        let provider_currency = self.provider.currency().to_uppercase();
        if !query.pricing.applies_rate() {
            return Ok((provider_currency, 1.0));
        }

        let target = query
            .currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| provider_currency.clone());

        if let Some(raw) = query.exchange_rate.as_deref() {
            return Ok((target, parse_exchange_rate(raw)?));
        }
        if target == provider_currency {
            return Ok((target, 1.0));
        }

        match self.rates.rate(&provider_currency, &target).await {
            Ok(rate) => Ok((target, rate)),
            Err(e) => {
                tracing::warn!(
                    "Exchange rate {}->{} unavailable ({}), keeping {}",
                    provider_currency,
                    target,
                    e,
                    provider_currency
                );
                Ok((provider_currency, 1.0))
            }
        }
    }

    /// Local reviews, else provider reviews
    pub async fn load_reviews(&self, hotel_id: &str) -> ResourceState<Vec<Review>> {
        match self.local.reviews(hotel_id).await {
            Ok(reviews) if !reviews.is_empty() => {
                return ResourceState::loaded(reviews, Origin::Local)
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to load local reviews of {}: {}", hotel_id, e);
                return ResourceState::failed(format!("Failed to load reviews: {}", e));
            }
        }

        match self.provider.reviews(hotel_id).await {
            Ok(reviews) => ResourceState::loaded(reviews, Origin::Provider),
            Err(e) => {
                tracing::error!("Provider reviews of {} failed: {}", hotel_id, e);
                ResourceState::failed(e.to_string())
            }
        }
    }

    /// Rate from one currency to another through the rate source
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        self.rates.rate(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::domain::a001_hotel::HotelDto;
    use contracts::domain::a002_room::{Room, RoomDto};
    use contracts::domain::a003_review::ReviewDto;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeCatalog {
        hotel: Option<Hotel>,
        rooms: Vec<Room>,
        reviews: Vec<Review>,
        broken: bool,
    }

    #[async_trait]
    impl LocalCatalog for FakeCatalog {
        async fn hotel(&self, _hotel_id: &str) -> anyhow::Result<Option<Hotel>> {
            if self.broken {
                anyhow::bail!("database is locked");
            }
            Ok(self.hotel.clone())
        }

        async fn rooms(&self, _hotel_id: &str) -> anyhow::Result<Vec<Room>> {
            if self.broken {
                anyhow::bail!("database is locked");
            }
            Ok(self.rooms.clone())
        }

        async fn reviews(&self, _hotel_id: &str) -> anyhow::Result<Vec<Review>> {
            if self.broken {
                anyhow::bail!("database is locked");
            }
            Ok(self.reviews.clone())
        }
    }

    #[derive(Default)]
    struct FakeProvider {
        hotel: Option<Hotel>,
        rooms_payload: Value,
        reviews_fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HotelProvider for FakeProvider {
        fn currency(&self) -> &str {
            "USD"
        }

        async fn hotel(&self, _hotel_id: &str) -> Result<Option<Hotel>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hotel.clone())
        }

        async fn room_availability(
            &self,
            _hotel_id: &str,
            search: &RoomSearch,
        ) -> Result<Value, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(search.currency, "USD");
            Ok(self.rooms_payload.clone())
        }

        async fn reviews(&self, _hotel_id: &str) -> Result<Vec<Review>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reviews_fail {
                return Err(ProviderError::Timeout("hotel provider".into()));
            }
            Ok(Vec::new())
        }
    }

    struct FakeRates {
        rate: Option<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for FakeRates {
        async fn rate(&self, _from: &str, _to: &str) -> Result<f64, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate
                .ok_or_else(|| ProviderError::Connect("exchange rate API".into()))
        }
    }

    fn rates(rate: Option<f64>) -> Arc<FakeRates> {
        Arc::new(FakeRates {
            rate,
            calls: AtomicUsize::new(0),
        })
    }

    fn hotel(name: &str, by_api: bool) -> Hotel {
        let mut hotel = Hotel::new_for_insert(HotelDto {
            name: name.into(),
            ..Default::default()
        });
        hotel.data_by_api = by_api;
        hotel
    }

    fn room_payload() -> Value {
        json!({
            "data": {
                "roomGroups": [{ "rooms": [{ "roomId": 7, "roomType": "Deluxe", "perNightAllInclusiveCharge": 100.0 }] }]
            }
        })
    }

    fn stay_query(currency: &str) -> HotelDetailsQuery {
        HotelDetailsQuery {
            checkin: Some("2025-03-10".into()),
            checkout: Some("2025-03-13".into()),
            currency: Some(currency.into()),
            ..Default::default()
        }
    }

    fn executor(
        local: FakeCatalog,
        provider: Arc<FakeProvider>,
        rates: Arc<FakeRates>,
    ) -> HotelDetailsExecutor {
        HotelDetailsExecutor::new(Arc::new(local), provider, rates, "usd")
    }

    #[tokio::test]
    async fn test_local_hotel_skips_provider() {
        let provider = Arc::new(FakeProvider::default());
        let local = FakeCatalog {
            hotel: Some(hotel("Local Inn", false)),
            ..Default::default()
        };
        let exec = executor(local, provider.clone(), rates(Some(1.0)));

        let state = exec.load_hotel("h1").await;
        assert_eq!(state.source(), Some(Origin::Local));
        assert_eq!(state.data().map(|h| h.name.as_str()), Some("Local Inn"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_local_hotel_falls_back_to_provider() {
        let provider = Arc::new(FakeProvider {
            hotel: Some(hotel("Provider Tower", true)),
            ..Default::default()
        });
        let exec = executor(FakeCatalog::default(), provider, rates(Some(1.0)));

        let state = exec.load_hotel("h1").await;
        assert_eq!(state.source(), Some(Origin::Provider));
        assert!(state.data().unwrap().data_by_api);
    }

    #[tokio::test]
    async fn test_unknown_hotel_is_failed() {
        let exec = executor(
            FakeCatalog::default(),
            Arc::new(FakeProvider::default()),
            rates(Some(1.0)),
        );
        let state = exec.load_hotel("h404").await;
        assert_eq!(state.error(), Some("Hotel h404 not found"));
    }

    #[tokio::test]
    async fn test_provider_rooms_are_priced_for_the_stay() {
        let provider = Arc::new(FakeProvider {
            rooms_payload: room_payload(),
            ..Default::default()
        });
        let rate_source = rates(Some(1.1));
        let exec = executor(FakeCatalog::default(), provider, rate_source.clone());

        let state = exec.load_rooms("h1", &stay_query("eur")).await;
        let availability = state.data().unwrap();
        assert_eq!(state.source(), Some(Origin::Provider));
        assert_eq!(availability.currency, "EUR");
        assert_eq!(availability.nights, 3);
        assert_eq!(availability.rooms.len(), 1);
        assert_eq!(availability.rooms[0].base_price, 330.0);
        assert_eq!(rate_source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_failure_keeps_provider_currency() {
        let provider = Arc::new(FakeProvider {
            rooms_payload: room_payload(),
            ..Default::default()
        });
        let exec = executor(FakeCatalog::default(), provider, rates(None));

        let state = exec.load_rooms("h1", &stay_query("EUR")).await;
        let availability = state.data().unwrap();
        assert_eq!(availability.currency, "USD");
        assert_eq!(availability.exchange_rate, 1.0);
        assert_eq!(availability.rooms[0].base_price, 300.0);
    }

    #[tokio::test]
    async fn test_supplied_rate_skips_lookup_and_bad_rate_fails() {
        let provider = Arc::new(FakeProvider {
            rooms_payload: room_payload(),
            ..Default::default()
        });
        let rate_source = rates(Some(9.0));
        let exec = executor(FakeCatalog::default(), provider, rate_source.clone());

        let mut query = stay_query("SAR");
        query.exchange_rate = Some("3.75".into());
        let state = exec.load_rooms("h1", &query).await;
        assert_eq!(state.data().unwrap().rooms[0].base_price, 1125.0);
        assert_eq!(rate_source.calls.load(Ordering::SeqCst), 0);

        query.exchange_rate = Some("abc".into());
        let state = exec.load_rooms("h1", &query).await;
        assert!(state.error().unwrap().contains("not a number"));
    }

    #[tokio::test]
    async fn test_local_rooms_are_returned_as_stored() {
        let provider = Arc::new(FakeProvider::default());
        let local = FakeCatalog {
            rooms: vec![Room::new_for_insert(RoomDto {
                hotel_id: "h1".into(),
                room_type: "Standard".into(),
                max_occupancy: 2,
                base_price: 80.0,
                quantity: 5,
                ..Default::default()
            })],
            ..Default::default()
        };
        let exec = executor(local, provider.clone(), rates(Some(2.0)));

        let state = exec.load_rooms("h1", &stay_query("EUR")).await;
        let availability = state.data().unwrap();
        assert_eq!(state.source(), Some(Origin::Local));
        assert_eq!(availability.currency, "USD");
        assert_eq!(availability.pricing, PricingMode::PerNight);
        assert_eq!(availability.rooms[0].base_price, 80.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_stay_date_keeps_local_rooms() {
        let provider = Arc::new(FakeProvider::default());
        let local = FakeCatalog {
            rooms: vec![Room::new_for_insert(RoomDto {
                hotel_id: "h1".into(),
                room_type: "Standard".into(),
                max_occupancy: 2,
                base_price: 80.0,
                quantity: 5,
                ..Default::default()
            })],
            ..Default::default()
        };
        let exec = executor(local, provider.clone(), rates(Some(1.0)));
        let query = HotelDetailsQuery {
            checkin: Some("not-a-date".into()),
            ..Default::default()
        };

        let state = exec.load_rooms("h1", &query).await;
        assert_eq!(state.source(), Some(Origin::Local));
        assert_eq!(state.data().map(|a| a.rooms.len()), Some(1));
        assert_eq!(state.data().map(|a| a.nights), Some(0));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_stay_date_fails_provider_rooms() {
        let provider = Arc::new(FakeProvider {
            rooms_payload: room_payload(),
            ..Default::default()
        });
        let exec = executor(FakeCatalog::default(), provider.clone(), rates(Some(1.0)));
        let query = HotelDetailsQuery {
            checkin: Some("not-a-date".into()),
            ..Default::default()
        };

        let state = exec.load_rooms("h1", &query).await;
        assert!(state.data().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_one_failed_resource_does_not_block_others() {
        let provider = Arc::new(FakeProvider {
            rooms_payload: room_payload(),
            reviews_fail: true,
            ..Default::default()
        });
        let local = FakeCatalog {
            hotel: Some(hotel("Local Inn", false)),
            ..Default::default()
        };
        let exec = executor(local, provider, rates(Some(1.0)));

        let response = exec.load("h1", &stay_query("USD")).await;
        assert!(response.hotel.is_loaded());
        assert!(response.rooms.is_loaded());
        assert!(response.reviews.error().unwrap().contains("did not answer"));
    }

    #[tokio::test]
    async fn test_local_error_fails_resource_without_fallback() {
        let provider = Arc::new(FakeProvider::default());
        let local = FakeCatalog {
            broken: true,
            ..Default::default()
        };
        let exec = executor(local, provider.clone(), rates(Some(1.0)));

        let response = exec.load("h1", &HotelDetailsQuery::default()).await;
        assert!(response.hotel.error().unwrap().contains("database is locked"));
        assert!(response.rooms.error().is_some());
        assert!(response.reviews.error().is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_reviews_win() {
        let local = FakeCatalog {
            reviews: vec![Review::new_for_insert(ReviewDto {
                hotel_id: "h1".into(),
                reviewer_name: "Omar".into(),
                rating: 8.5,
                ..Default::default()
            })],
            ..Default::default()
        };
        let exec = executor(local, Arc::new(FakeProvider::default()), rates(None));
        let state = exec.load_reviews("h1").await;
        assert_eq!(state.source(), Some(Origin::Local));
        assert_eq!(state.data().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_stay_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let stay = resolve_stay(&HotelDetailsQuery::default(), today).unwrap();
        assert_eq!(stay.checkin, today);
        assert_eq!(stay.checkout, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(stay.nights, 1);

        let query = HotelDetailsQuery {
            checkin: Some("2025-03-10".into()),
            ..Default::default()
        };
        let stay = resolve_stay(&query, today).unwrap();
        assert_eq!(stay.checkout, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        let query = HotelDetailsQuery {
            checkin: Some("10/03/2025".into()),
            ..Default::default()
        };
        assert!(resolve_stay(&query, today).is_err());
    }
}
