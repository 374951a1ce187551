use axum::{
    extract::{Path, Query},
    Json,
};
use contracts::domain::a004_umrah_package::UmrahPackage;
use contracts::shared::pagination::PaginatedResponse;
use serde::Deserialize;

use crate::domain::a004_umrah_package;

#[derive(Debug, Deserialize)]
pub struct PackageListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// GET /api/umrah-packages?page=&page_size=
pub async fn list(
    Query(params): Query<PackageListParams>,
) -> Result<Json<PaginatedResponse<UmrahPackage>>, axum::http::StatusCode> {
    let page = params.page.unwrap_or(0);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);

    match a004_umrah_package::service::list_all().await {
        Ok(all) => Ok(Json(PaginatedResponse::from_full_list(all, page, page_size))),
        Err(e) => {
            tracing::error!("Failed to list Umrah packages: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/umrah-packages/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<UmrahPackage>, axum::http::StatusCode> {
    match a004_umrah_package::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/umrah-packages/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    match a004_umrah_package::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
