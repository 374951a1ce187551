use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Listing photos arrive in one multipart body
const MAX_LISTING_UPLOAD: usize = 50 * 1024 * 1024;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // HOTELS (local catalog)
        // ========================================
        .route(
            "/api/hotels",
            get(handlers::a001_hotel::list).post(handlers::a001_hotel::upsert),
        )
        .route(
            "/api/hotels/:id",
            get(handlers::a001_hotel::get_by_id).delete(handlers::a001_hotel::delete),
        )
        .route(
            "/api/hotels/:id/rooms/local",
            get(handlers::a002_room::list_by_hotel),
        )
        .route(
            "/api/hotels/:id/reviews/local",
            get(handlers::a003_review::list_by_hotel),
        )
        // ========================================
        // HOTEL DETAILS (local first, provider fallback)
        // ========================================
        .route(
            "/api/hotels/:id/details",
            get(handlers::u501_hotel_details::details),
        )
        .route(
            "/api/hotels/:id/details/hotel",
            get(handlers::u501_hotel_details::hotel),
        )
        .route(
            "/api/hotels/:id/details/rooms",
            get(handlers::u501_hotel_details::rooms),
        )
        .route(
            "/api/hotels/:id/details/reviews",
            get(handlers::u501_hotel_details::reviews),
        )
        // ========================================
        // ROOMS / REVIEWS
        // ========================================
        .route("/api/rooms", post(handlers::a002_room::upsert))
        .route(
            "/api/rooms/:id",
            axum::routing::delete(handlers::a002_room::delete),
        )
        .route("/api/reviews", post(handlers::a003_review::create))
        .route(
            "/api/reviews/:id",
            axum::routing::delete(handlers::a003_review::delete),
        )
        // ========================================
        // UMRAH PACKAGES
        // ========================================
        .route(
            "/api/umrah-packages",
            get(handlers::a004_umrah_package::list),
        )
        .route(
            "/api/umrah-packages/:id",
            get(handlers::a004_umrah_package::get_by_id)
                .delete(handlers::a004_umrah_package::delete),
        )
        // ========================================
        // LISTING WIZARDS (multipart)
        // ========================================
        .route(
            "/api/listings/property",
            post(handlers::u502_publish_listing::publish_property)
                .layer(DefaultBodyLimit::max(MAX_LISTING_UPLOAD)),
        )
        .route(
            "/api/listings/umrah",
            post(handlers::u502_publish_listing::publish_umrah)
                .layer(DefaultBodyLimit::max(MAX_LISTING_UPLOAD)),
        )
        // ========================================
        // UTILITIES
        // ========================================
        .route("/api/currency/rate", get(handlers::currency::rate))
}
