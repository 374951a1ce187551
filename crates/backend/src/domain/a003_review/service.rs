use super::repository;
use contracts::domain::a003_review::{Review, ReviewDto};

/// Новый отзыв гостя
pub async fn create(dto: ReviewDto) -> anyhow::Result<String> {
    let aggregate = Review::new_for_insert(dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    repository::insert(&aggregate).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn list_by_hotel(hotel_id: &str) -> anyhow::Result<Vec<Review>> {
    repository::list_by_hotel(hotel_id).await
}
