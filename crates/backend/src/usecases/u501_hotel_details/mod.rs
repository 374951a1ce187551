pub mod executor;
pub mod room_normalizer;
pub mod sources;

use once_cell::sync::OnceCell;
use std::sync::Arc;

pub use executor::HotelDetailsExecutor;

use crate::shared::config::Config;
use crate::shared::providers::exchange_rate::ExchangeRateClient;
use crate::shared::providers::hotel_provider::HotelProviderClient;
use sources::DbCatalog;

static EXECUTOR: OnceCell<HotelDetailsExecutor> = OnceCell::new();

/// Build the executor over the database and the configured HTTP clients
pub fn initialize(config: &Config) -> anyhow::Result<()> {
    let provider = HotelProviderClient::new(&config.hotel_provider)?;
    let rates = ExchangeRateClient::new(&config.exchange)?;

    let executor = HotelDetailsExecutor::new(
        Arc::new(DbCatalog),
        Arc::new(provider),
        Arc::new(rates),
        &config.catalog.currency,
    );

    EXECUTOR
        .set(executor)
        .map_err(|_| anyhow::anyhow!("Hotel details executor is already initialized"))
}

pub fn executor() -> anyhow::Result<&'static HotelDetailsExecutor> {
    EXECUTOR
        .get()
        .ok_or_else(|| anyhow::anyhow!("Hotel details executor has not been initialized"))
}
