use axum::{extract::Path, Json};
use contracts::domain::a002_room::{Room, RoomDto};
use serde_json::json;

use crate::domain::a002_room;

/// GET /api/hotels/:hotel_id/rooms/local
pub async fn list_by_hotel(
    Path(hotel_id): Path<String>,
) -> Result<Json<Vec<Room>>, axum::http::StatusCode> {
    match a002_room::service::list_by_hotel(&hotel_id).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list rooms of {}: {}", hotel_id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/rooms
pub async fn upsert(
    Json(dto): Json<RoomDto>,
) -> Result<Json<serde_json::Value>, (axum::http::StatusCode, Json<serde_json::Value>)> {
    let result = match dto.id.clone() {
        Some(id) => a002_room::service::update(dto).await.map(|_| id),
        None => a002_room::service::create(dto).await,
    };
    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            let error_msg = format!("{}", e);
            tracing::error!("Failed to save room: {}", error_msg);
            Err((
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"error": error_msg})),
            ))
        }
    }
}

/// DELETE /api/rooms/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    match a002_room::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
