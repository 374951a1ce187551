use axum::{extract::Multipart, Json};
use contracts::usecases::u502_property_listing::PublishedListing;
use contracts::usecases::u503_umrah_package::PublishedPackage;
use serde_json::json;

use crate::shared::config;
use crate::shared::uploads::{read_wizard_submission, WizardSubmission};
use crate::usecases::u502_publish_listing::{self, PublishError};

type ErrorResponse = (axum::http::StatusCode, Json<serde_json::Value>);

fn error_response(e: PublishError) -> ErrorResponse {
    match e {
        PublishError::Step(step) => {
            tracing::warn!("Listing rejected at step {}: {}", step.step, step);
            (
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": step.to_string(),
                    "step": step.step,
                    "field": step.field,
                })),
            )
        }
        PublishError::Field(field) => (
            axum::http::StatusCode::BAD_REQUEST,
            Json(json!({"error": field.to_string(), "field": field.field})),
        ),
        PublishError::Storage(e) => {
            tracing::error!("Failed to publish listing: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("{}", e)})),
            )
        }
    }
}

async fn read_submission(multipart: &mut Multipart) -> Result<WizardSubmission, ErrorResponse> {
    let uploads_dir = config::get()
        .map(config::get_uploads_dir)
        .map_err(|e| {
            tracing::error!("{}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Configuration is not loaded"})),
            )
        })?;

    read_wizard_submission(multipart, &uploads_dir)
        .await
        .map_err(|e| {
            tracing::warn!("Unreadable listing submission: {}", e);
            (
                axum::http::StatusCode::BAD_REQUEST,
                Json(json!({"error": e.to_string()})),
            )
        })
}

/// POST /api/listings/property (multipart/form-data)
pub async fn publish_property(
    mut multipart: Multipart,
) -> Result<Json<PublishedListing>, ErrorResponse> {
    let submission = read_submission(&mut multipart).await?;
    u502_publish_listing::publish_submission(
        submission,
        u502_publish_listing::prepare_property_listing,
        u502_publish_listing::publish_property_listing,
    )
    .await
    .map(Json)
    .map_err(error_response)
}

/// POST /api/listings/umrah (multipart/form-data)
pub async fn publish_umrah(
    mut multipart: Multipart,
) -> Result<Json<PublishedPackage>, ErrorResponse> {
    let submission = read_submission(&mut multipart).await?;
    u502_publish_listing::publish_submission(
        submission,
        u502_publish_listing::prepare_umrah_package,
        u502_publish_listing::publish_umrah_package,
    )
    .await
    .map(Json)
    .map_err(error_response)
}
