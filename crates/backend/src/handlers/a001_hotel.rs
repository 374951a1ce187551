use axum::{
    extract::{Path, RawQuery},
    Json,
};
use contracts::domain::a001_hotel::{Hotel, HotelDto};
use contracts::shared::pagination::PaginatedResponse;
use contracts::shared::search_filter::SearchFilter;
use serde_json::json;

use crate::domain::a001_hotel;

/// GET /api/hotels?v=1&destination=&checkin=&checkout=&min_stars=&page=&page_size=
pub async fn list(
    RawQuery(query): RawQuery,
) -> Result<Json<PaginatedResponse<Hotel>>, (axum::http::StatusCode, Json<serde_json::Value>)> {
    let filter = SearchFilter::from_query_string(query.as_deref().unwrap_or("")).map_err(|e| {
        tracing::warn!("Rejected hotel search filter: {}", e);
        (
            axum::http::StatusCode::BAD_REQUEST,
            Json(json!({"error": e.to_string()})),
        )
    })?;

    match a001_hotel::service::search(&filter).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to search hotels: {}", e);
            Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to search hotels"})),
            ))
        }
    }
}

/// GET /api/hotels/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Hotel>, axum::http::StatusCode> {
    match a001_hotel::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load hotel {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/hotels
pub async fn upsert(
    Json(dto): Json<HotelDto>,
) -> Result<Json<serde_json::Value>, (axum::http::StatusCode, Json<serde_json::Value>)> {
    tracing::debug!("Received hotel upsert: id={:?}, name={}", dto.id, dto.name);

    let result = match dto.id.clone() {
        Some(id) => a001_hotel::service::update(dto).await.map(|_| id),
        None => a001_hotel::service::create(dto).await,
    };
    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            let error_msg = format!("{}", e);
            tracing::error!("Failed to save hotel: {}", error_msg);
            Err((
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"error": error_msg})),
            ))
        }
    }
}

/// DELETE /api/hotels/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    match a001_hotel::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete hotel {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
