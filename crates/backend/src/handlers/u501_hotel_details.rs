use axum::{
    extract::{Path, Query},
    Json,
};
use contracts::domain::a001_hotel::Hotel;
use contracts::domain::a003_review::Review;
use contracts::usecases::u501_hotel_details::{
    HotelDetailsQuery, HotelDetailsResponse, ResourceState, RoomAvailability,
};

use crate::usecases::u501_hotel_details::{executor, HotelDetailsExecutor};

fn details_executor() -> Result<&'static HotelDetailsExecutor, axum::http::StatusCode> {
    executor().map_err(|e| {
        tracing::error!("{}", e);
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    })
}

/// GET /api/hotels/:id/details?checkin=&checkout=&currency=&exchange_rate=&adults=&rooms=&pricing=
pub async fn details(
    Path(hotel_id): Path<String>,
    Query(query): Query<HotelDetailsQuery>,
) -> Result<Json<HotelDetailsResponse>, axum::http::StatusCode> {
    let executor = details_executor()?;
    Ok(Json(executor.load(&hotel_id, &query).await))
}

/// GET /api/hotels/:id/details/hotel (retry)
pub async fn hotel(
    Path(hotel_id): Path<String>,
) -> Result<Json<ResourceState<Hotel>>, axum::http::StatusCode> {
    let executor = details_executor()?;
    Ok(Json(executor.load_hotel(&hotel_id).await))
}

/// GET /api/hotels/:id/details/rooms (retry)
pub async fn rooms(
    Path(hotel_id): Path<String>,
    Query(query): Query<HotelDetailsQuery>,
) -> Result<Json<ResourceState<RoomAvailability>>, axum::http::StatusCode> {
    let executor = details_executor()?;
    Ok(Json(executor.load_rooms(&hotel_id, &query).await))
}

/// GET /api/hotels/:id/details/reviews (retry)
pub async fn reviews(
    Path(hotel_id): Path<String>,
) -> Result<Json<ResourceState<Vec<Review>>>, axum::http::StatusCode> {
    let executor = details_executor()?;
    Ok(Json(executor.load_reviews(&hotel_id).await))
}
