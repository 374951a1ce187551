use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::{preview, ProviderError};
use crate::shared::config::ExchangeConfig;

const SERVICE: &str = "exchange rate API";

/// Client of the public exchange rate API (no auth)
pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRatesResponse {
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl ExchangeRatesResponse {
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        self.rates
            .get(&currency.to_uppercase())
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}

impl ExchangeRateClient {
    pub fn new(config: &ExchangeConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET {base_url}/{BASE}
    pub async fn fetch_rates(&self, base: &str) -> Result<ExchangeRatesResponse, ProviderError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&base.to_uppercase()));
        tracing::debug!("Fetching exchange rates: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(SERVICE, e))?;

        if !status.is_success() {
            tracing::error!("Exchange rate API failed with status {}: {}", status, preview(&body));
            return Err(ProviderError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        serde_json::from_str::<ExchangeRatesResponse>(&body).map_err(|e| ProviderError::Parse {
            service: SERVICE.to_string(),
            message: e.to_string(),
        })
    }

    /// Rate that converts an amount in `from` into `to`
    pub async fn rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(1.0);
        }
        let rates = self.fetch_rates(from).await?;
        rates.rate_for(to).ok_or_else(|| {
            ProviderError::Other(format!("No exchange rate from {} to {}", from, to))
        })
    }
}
