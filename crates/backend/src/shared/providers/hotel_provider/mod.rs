pub mod models;

use chrono::NaiveDate;
use contracts::domain::a001_hotel::Hotel;
use contracts::domain::a003_review::Review;
use serde_json::Value;
use std::time::Duration;

use super::{preview, ProviderError};
use crate::shared::config::HotelProviderConfig;

const SERVICE: &str = "hotel provider";

/// Room availability search parameters
#[derive(Debug, Clone)]
pub struct RoomSearch {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub adults: u32,
    pub rooms: u32,
    pub currency: String,
}

/// HTTP client of the RapidAPI hotel provider
pub struct HotelProviderClient {
    client: reqwest::Client,
    base_url: String,
    host: String,
    api_key_env: String,
    api_key: Option<String>,
    currency: String,
}

impl HotelProviderClient {
    /// Builds without a key too: the server still starts and provider
    /// calls return `MissingApiKey`
    pub fn new(config: &HotelProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .deflate(true)
            .build()?;

        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::warn!(
                "Hotel provider API key is not set ({}); provider lookups will fail",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host: config.host.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
            currency: config.currency.to_uppercase(),
        })
    }

    /// Currency the provider quotes room prices in by default
    pub fn currency(&self) -> &str {
        &self.currency
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey(self.api_key_env.clone()))?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Provider request: GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.host)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Provider request {} failed: {}", path, e);
                ProviderError::from_reqwest(SERVICE, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(SERVICE, e))?;

        if !status.is_success() {
            tracing::error!(
                "Provider {} failed with status {}: {}",
                path,
                status,
                preview(&body)
            );
            return Err(ProviderError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse provider {} response: {}. Body: {}",
                path,
                e,
                preview(&body)
            );
            ProviderError::Parse {
                service: SERVICE.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// GET /hotels/details?id=
    pub async fn hotel_details(&self, hotel_id: &str) -> Result<Option<Hotel>, ProviderError> {
        let payload = self
            .get_json("/hotels/details", &[("id", hotel_id.to_string())])
            .await?;
        Ok(models::map_hotel(hotel_id, &payload))
    }

    /// GET /hotels/room-prices. Returns the raw payload; room groups are
    /// normalized by the caller that knows the pricing context.
    pub async fn room_availability(
        &self,
        hotel_id: &str,
        search: &RoomSearch,
    ) -> Result<Value, ProviderError> {
        let query = [
            ("propertyId", hotel_id.to_string()),
            ("checkinDate", search.checkin.format("%Y-%m-%d").to_string()),
            ("checkoutDate", search.checkout.format("%Y-%m-%d").to_string()),
            ("adult", search.adults.max(1).to_string()),
            ("rooms", search.rooms.max(1).to_string()),
            ("currency", search.currency.to_uppercase()),
        ];
        self.get_json("/hotels/room-prices", &query).await
    }

    /// GET /hotels/reviews?id=
    pub async fn reviews(&self, hotel_id: &str) -> Result<Vec<Review>, ProviderError> {
        let payload = self
            .get_json("/hotels/reviews", &[("id", hotel_id.to_string())])
            .await?;
        Ok(models::map_reviews(hotel_id, &payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> HotelProviderConfig {
        HotelProviderConfig {
            base_url: "http://127.0.0.1:9/".into(),
            host: "provider.test".into(),
            api_key_env: "HOTEL_PROVIDER_KEY_FOR_TESTS_NEVER_SET".into(),
            currency: "usd".into(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_client_normalizes_config() {
        let client = HotelProviderClient::new(&config_without_key()).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9");
        assert_eq!(client.currency(), "USD");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = HotelProviderClient::new(&config_without_key()).unwrap();
        let err = client.hotel_details("42").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey(ref env) if env == "HOTEL_PROVIDER_KEY_FOR_TESTS_NEVER_SET"));
    }
}
