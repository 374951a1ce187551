use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::shared::providers::ProviderError;
use crate::usecases::u501_hotel_details::executor;

#[derive(Debug, Deserialize)]
pub struct RateParams {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

/// GET /api/currency/rate?from=USD&to=EUR
pub async fn rate(
    Query(params): Query<RateParams>,
) -> Result<Json<RateResponse>, (axum::http::StatusCode, Json<serde_json::Value>)> {
    let from = params.from.trim().to_uppercase();
    let to = params.to.trim().to_uppercase();

    let executor = executor().map_err(|e| {
        tracing::error!("{}", e);
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": e.to_string()})),
        )
    })?;

    match executor.exchange_rate(&from, &to).await {
        Ok(rate) => Ok(Json(RateResponse { from, to, rate })),
        Err(e) => {
            tracing::error!("Exchange rate {}->{} failed: {}", from, to, e);
            let status = match e {
                ProviderError::Other(_) => axum::http::StatusCode::NOT_FOUND,
                ProviderError::Timeout(_) => axum::http::StatusCode::GATEWAY_TIMEOUT,
                _ => axum::http::StatusCode::BAD_GATEWAY,
            };
            Err((status, Json(json!({"error": e.to_string()}))))
        }
    }
}
