use async_trait::async_trait;
use contracts::domain::a001_hotel::Hotel;
use contracts::domain::a002_room::Room;
use contracts::domain::a003_review::Review;
use serde_json::Value;

use crate::domain::{a001_hotel, a002_room, a003_review};
use crate::shared::providers::exchange_rate::ExchangeRateClient;
use crate::shared::providers::hotel_provider::{HotelProviderClient, RoomSearch};
use crate::shared::providers::ProviderError;

/// Local SQLite catalog
#[async_trait]
pub trait LocalCatalog: Send + Sync {
    async fn hotel(&self, hotel_id: &str) -> anyhow::Result<Option<Hotel>>;
    async fn rooms(&self, hotel_id: &str) -> anyhow::Result<Vec<Room>>;
    async fn reviews(&self, hotel_id: &str) -> anyhow::Result<Vec<Review>>;
}

/// Third-party hotel provider
#[async_trait]
pub trait HotelProvider: Send + Sync {
    /// Currency of the provider's per-night charges
    fn currency(&self) -> &str;
    async fn hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, ProviderError>;
    async fn room_availability(
        &self,
        hotel_id: &str,
        search: &RoomSearch,
    ) -> Result<Value, ProviderError>;
    async fn reviews(&self, hotel_id: &str) -> Result<Vec<Review>, ProviderError>;
}

/// Exchange rates
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError>;
}

/// Catalog backed by the domain services
pub struct DbCatalog;

#[async_trait]
impl LocalCatalog for DbCatalog {
    async fn hotel(&self, hotel_id: &str) -> anyhow::Result<Option<Hotel>> {
        a001_hotel::service::get_by_id(hotel_id).await
    }

    async fn rooms(&self, hotel_id: &str) -> anyhow::Result<Vec<Room>> {
        a002_room::service::list_by_hotel(hotel_id).await
    }

    async fn reviews(&self, hotel_id: &str) -> anyhow::Result<Vec<Review>> {
        a003_review::service::list_by_hotel(hotel_id).await
    }
}

#[async_trait]
impl HotelProvider for HotelProviderClient {
    fn currency(&self) -> &str {
        HotelProviderClient::currency(self)
    }

    async fn hotel(&self, hotel_id: &str) -> Result<Option<Hotel>, ProviderError> {
        self.hotel_details(hotel_id).await
    }

    async fn room_availability(
        &self,
        hotel_id: &str,
        search: &RoomSearch,
    ) -> Result<Value, ProviderError> {
        HotelProviderClient::room_availability(self, hotel_id, search).await
    }

    async fn reviews(&self, hotel_id: &str) -> Result<Vec<Review>, ProviderError> {
        HotelProviderClient::reviews(self, hotel_id).await
    }
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        ExchangeRateClient::rate(self, from, to).await
    }
}
