use axum::{extract::Path, Json};
use contracts::domain::a003_review::{average_rating, Review, ReviewDto};
use serde::Serialize;
use serde_json::json;

use crate::domain::a003_review;

#[derive(Serialize)]
pub struct ReviewListResponse {
    pub items: Vec<Review>,
    pub average_rating: Option<f32>,
}

/// GET /api/hotels/:hotel_id/reviews/local
pub async fn list_by_hotel(
    Path(hotel_id): Path<String>,
) -> Result<Json<ReviewListResponse>, axum::http::StatusCode> {
    match a003_review::service::list_by_hotel(&hotel_id).await {
        Ok(items) => Ok(Json(ReviewListResponse {
            average_rating: average_rating(&items),
            items,
        })),
        Err(e) => {
            tracing::error!("Failed to list reviews of {}: {}", hotel_id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/reviews
pub async fn create(
    Json(dto): Json<ReviewDto>,
) -> Result<Json<serde_json::Value>, (axum::http::StatusCode, Json<serde_json::Value>)> {
    match a003_review::service::create(dto).await {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            let error_msg = format!("{}", e);
            tracing::error!("Failed to save review: {}", error_msg);
            Err((
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"error": error_msg})),
            ))
        }
    }
}

/// DELETE /api/reviews/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    match a003_review::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
